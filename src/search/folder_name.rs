//! Folder name search. A matched folder can additionally be required to
//! contain at least one file whose content matches a second pattern.

use super::{file_contains, NameFilters, SearchContext, PAUSE_POLL};
use crate::ignore::{is_ignored, rel_posix, IgnoreRule};
use crate::matcher::Matcher;
use crate::processor;
use crate::record::MatchRecord;
use crate::walker::Walker;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

pub(super) fn run(ctx: &SearchContext) {
    let req = &ctx.request;
    let matcher = match Matcher::compile(&req.pattern) {
        Ok(matcher) => matcher,
        Err(e) => {
            ctx.log(format!("Invalid folder regex: {e}"));
            return;
        }
    };
    let content_filter = match &req.content_filter {
        Some(spec) => match Matcher::compile(spec) {
            Ok(matcher) => Some(matcher),
            Err(e) => {
                ctx.log(format!("Invalid content regex: {e}"));
                return;
            }
        },
        None => None,
    };
    let filters = match NameFilters::compile(req) {
        Ok(filters) => filters,
        Err(e) => {
            ctx.log(e.to_string());
            return;
        }
    };
    let rules = super::ignore_rules(req);
    let mut walker = Walker::new(&req.root, req.depth_limit, req.skip_hidden, &rules);
    let base = walker.root().to_path_buf();

    while let Some(batch) = walker.next_batch() {
        if ctx.state.is_cancelled() {
            break;
        }
        let mut batch = match batch {
            Ok(batch) => batch,
            Err(e) => {
                ctx.log(e.to_string());
                continue;
            }
        };
        batch.subdirs.retain(|name| !filters.excludes_dir(name));
        ctx.log(format!("Scanning: {}", batch.dir.display()));

        for name in &batch.subdirs {
            if !ctx.checkpoint(PAUSE_POLL) {
                break;
            }
            ctx.state.add_scanned(1);
            if !matcher.is_match(name) {
                continue;
            }
            let path = batch.dir.join(name);
            let (matched, files_considered) =
                scan_folder(ctx, content_filter.as_ref(), &filters, &rules, &base, &path);
            if content_filter.is_some() && !matched {
                continue;
            }
            ctx.state.add_matched(1);
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or_else(|_| SystemTime::now());
            ctx.emit(MatchRecord::FolderName {
                path,
                modified,
                content_matched: content_filter.is_some(),
                files_considered,
            });
        }
        walker.descend(&batch);
    }
}

/// Examines a folder's direct files. Counts the files that pass the
/// name, ignore and size filters; with a content filter, returns as
/// soon as one of them matches. An unreadable folder counts as empty.
fn scan_folder(
    ctx: &SearchContext,
    content_filter: Option<&Matcher>,
    filters: &NameFilters,
    rules: &[IgnoreRule],
    base: &Path,
    folder: &Path,
) -> (bool, u64) {
    let req = &ctx.request;
    let entries = match fs::read_dir(folder) {
        Ok(entries) => entries,
        Err(_) => return (false, 0),
    };

    let mut files_seen = 0;
    for entry in entries.flatten() {
        if !ctx.checkpoint(PAUSE_POLL) {
            break;
        }
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if req.skip_hidden && name.starts_with('.') {
            continue;
        }
        if !filters.accepts_file(&name) {
            continue;
        }
        if !rules.is_empty() {
            if let Some(rel) = rel_posix(&entry.path(), base) {
                if is_ignored(&rel, false, rules) {
                    continue;
                }
            }
        }
        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(_) => continue,
        };
        if req.max_file_size.is_some_and(|cap| size > cap) {
            continue;
        }
        files_seen += 1;
        let filter = match content_filter {
            Some(filter) => filter,
            None => continue,
        };
        if processor::is_binary(&entry.path()) {
            continue;
        }
        match file_contains(ctx, filter, &entry.path()) {
            Some(true) => return (true, files_seen),
            Some(false) => {}
            None => break,
        }
    }
    (false, files_seen)
}
