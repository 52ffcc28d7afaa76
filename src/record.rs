//! Result records emitted by the search workers.

use byte_unit::Byte;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One hit produced by a search. Records carry raw values; rendering is
/// left to the consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchRecord {
    /// A matching line inside a file.
    Content {
        path: PathBuf,
        /// 1-based line number.
        line_number: u64,
        line: String,
    },
    /// A file whose name matched.
    FileName {
        path: PathBuf,
        size: u64,
        modified: SystemTime,
        /// True when a content filter was requested and the file passed it.
        content_matched: bool,
    },
    /// A directory whose name matched.
    FolderName {
        path: PathBuf,
        modified: SystemTime,
        content_matched: bool,
        /// Direct files that survived this folder's file filters.
        files_considered: u64,
    },
}

impl MatchRecord {
    pub fn path(&self) -> &Path {
        match self {
            MatchRecord::Content { path, .. }
            | MatchRecord::FileName { path, .. }
            | MatchRecord::FolderName { path, .. } => path,
        }
    }
}

/// Human-readable byte count, e.g. `1.21 KiB`.
pub fn format_size(bytes: u64) -> String {
    let adjusted = Byte::from_u64(bytes).get_appropriate_unit(byte_unit::UnitType::Binary);
    format!("{:.2} {}", adjusted.get_value(), adjusted.get_unit())
}

/// Local wall-clock rendering used for modification times.
pub fn format_timestamp(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%Y-%m-%d %H:%M").to_string()
}
