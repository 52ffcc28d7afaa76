//! Depth-first directory traversal yielding one batch per visited
//! directory. Descent is caller-driven: prune `DirBatch::subdirs` to any
//! policy, then hand the batch back via [`Walker::descend`]; names removed
//! from the list are never visited.

use crate::error::{GrepperError, Result};
use crate::ignore::{is_ignored, rel_posix, IgnoreRule};
use std::fs;
use std::path::{Path, PathBuf};

/// The entries of one visited directory, filtered and sorted.
#[derive(Debug, Clone)]
pub struct DirBatch {
    pub dir: PathBuf,
    /// Depth from the walk root; the root itself is 0.
    pub depth: usize,
    pub subdirs: Vec<String>,
    pub files: Vec<String>,
}

pub struct Walker<'a> {
    root: PathBuf,
    depth_limit: Option<usize>,
    skip_hidden: bool,
    rules: &'a [IgnoreRule],
    pending: Vec<(PathBuf, usize)>,
}

impl<'a> Walker<'a> {
    pub fn new(
        root: &Path,
        depth_limit: Option<usize>,
        skip_hidden: bool,
        rules: &'a [IgnoreRule],
    ) -> Self {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        let pending = vec![(root.clone(), 0)];
        Walker {
            root,
            depth_limit,
            skip_hidden,
            rules,
            pending,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Yields the next directory batch, top-down. An unreadable directory
    /// comes back as an error the caller can log; the walk continues with
    /// the remaining directories either way.
    pub fn next_batch(&mut self) -> Option<Result<DirBatch>> {
        let (dir, depth) = self.pending.pop()?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) => return Some(Err(GrepperError::UnreadableEntry { path: dir, source })),
        };

        let mut subdirs = Vec::new();
        let mut files = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                subdirs.push(name);
            } else {
                files.push(name);
            }
        }
        subdirs.sort_unstable();
        files.sort_unstable();

        if self.depth_limit.is_some_and(|limit| depth >= limit) {
            subdirs.clear();
        }
        if self.skip_hidden {
            subdirs.retain(|name| !name.starts_with('.'));
            files.retain(|name| !name.starts_with('.'));
        }
        if !self.rules.is_empty() {
            subdirs.retain(|name| !self.ignored(&dir, name, true));
            files.retain(|name| !self.ignored(&dir, name, false));
        }

        Some(Ok(DirBatch {
            dir,
            depth,
            subdirs,
            files,
        }))
    }

    /// Schedules the batch's remaining subdirectories for traversal.
    /// Pushed in reverse so the walk visits them in listed order.
    pub fn descend(&mut self, batch: &DirBatch) {
        for name in batch.subdirs.iter().rev() {
            self.pending.push((batch.dir.join(name), batch.depth + 1));
        }
    }

    fn ignored(&self, dir: &Path, name: &str, is_dir: bool) -> bool {
        match rel_posix(&dir.join(name), &self.root) {
            Some(rel) => is_ignored(&rel, is_dir, self.rules),
            None => false,
        }
    }
}
