//! Search request definition shared by the engine and its consumers.

use crate::matcher::PatternSpec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What kind of records a search produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Match lines inside files.
    Content,
    /// Match file names.
    FileName,
    /// Match directory names.
    FolderName,
}

/// A fully-specified search. [`Default`] gives a content search of the
/// current directory that skips hidden entries and honours ignore files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub root: PathBuf,
    pub mode: SearchMode,
    pub pattern: PatternSpec,
    /// Secondary content filter for name searches.
    pub content_filter: Option<PatternSpec>,
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    /// Extension filter for content searches, e.g. `".rs"`.
    pub file_type: Option<String>,
    /// Skip files larger than this many bytes.
    pub max_file_size: Option<u64>,
    /// Do not descend below this depth; the root is depth 0.
    pub depth_limit: Option<usize>,
    pub skip_hidden: bool,
    pub respect_ignore_rules: bool,
    /// Stop scanning a file after its first matching line.
    pub first_match_per_file: bool,
    /// Prefer the external `rg` backend for content searches.
    pub use_ripgrep: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            mode: SearchMode::Content,
            pattern: PatternSpec::default(),
            content_filter: None,
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
            file_type: None,
            max_file_size: None,
            depth_limit: None,
            skip_hidden: true,
            respect_ignore_rules: true,
            first_match_per_file: false,
            use_ripgrep: true,
        }
    }
}
