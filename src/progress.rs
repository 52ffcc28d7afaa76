//! Progress reporting for a running search.

use crate::request::SearchMode;
use crate::state::ExecutionState;
use std::time::Duration;

/// Point-in-time view of a run's counters.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub scanned: u64,
    pub matched: u64,
    pub elapsed: Duration,
    pub paused: bool,
}

impl ProgressSnapshot {
    pub fn capture(state: &ExecutionState) -> Self {
        ProgressSnapshot {
            scanned: state.scanned(),
            matched: state.matched(),
            elapsed: state.elapsed(),
            paused: state.is_paused(),
        }
    }

    /// Entries scanned per second since the run started.
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.scanned as f64 / secs
        } else {
            0.0
        }
    }
}

/// Scanned, matched and rate labels for a mode's status displays.
pub fn mode_labels(mode: SearchMode) -> (&'static str, &'static str, &'static str) {
    match mode {
        SearchMode::Content => ("Files", "Matches", "files/s"),
        SearchMode::FileName => ("Files", "Files matched", "files/s"),
        SearchMode::FolderName => ("Folders", "Folders matched", "folders/s"),
    }
}

/// One-line status summary. Labels follow the mode: content searches
/// count files and matching lines, name searches count the entries they
/// examined.
pub fn status_line(mode: SearchMode, snapshot: &ProgressSnapshot) -> String {
    let (scanned_label, match_label, rate_label) = mode_labels(mode);
    let phase = if snapshot.paused { "Paused" } else { "Running" };
    format!(
        "{phase} | {scanned_label}: {} | {match_label}: {} | Elapsed: {:.1}s | {:.1} {rate_label}",
        snapshot.scanned,
        snapshot.matched,
        snapshot.elapsed.as_secs_f64(),
        snapshot.rate()
    )
}
