//! Search workers. One worker per mode, plus an external ripgrep
//! backend for content searches.

mod content;
mod file_name;
mod folder_name;
mod ripgrep;

use crate::error::Result;
use crate::ignore::{self, IgnoreRule};
use crate::matcher::{compile_globs, matches_any, Matcher};
use crate::processor::LossyLines;
use crate::record::MatchRecord;
use crate::request::{SearchMode, SearchRequest};
use crate::state::ExecutionState;
use crossbeam_channel::Sender;
use glob::Pattern;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Pause poll between directory entries.
pub(crate) const PAUSE_POLL: Duration = Duration::from_millis(50);
/// Pause poll between lines of one file.
pub(crate) const LINE_PAUSE_POLL: Duration = Duration::from_millis(10);

/// Everything a worker needs: the request, shared state and the two
/// output channels.
pub struct SearchContext {
    pub(crate) request: SearchRequest,
    pub(crate) state: Arc<ExecutionState>,
    results: Sender<MatchRecord>,
    logs: Sender<String>,
}

impl SearchContext {
    pub fn new(
        request: SearchRequest,
        state: Arc<ExecutionState>,
        results: Sender<MatchRecord>,
        logs: Sender<String>,
    ) -> Self {
        SearchContext {
            request,
            state,
            results,
            logs,
        }
    }

    pub(crate) fn emit(&self, record: MatchRecord) {
        let _ = self.results.send(record);
    }

    pub(crate) fn log(&self, line: impl Into<String>) {
        let _ = self.logs.send(line.into());
    }

    /// Pause gate. `false` means the run was cancelled and the worker
    /// should unwind.
    pub(crate) fn checkpoint(&self, poll: Duration) -> bool {
        self.state.wait_if_paused(poll)
    }
}

/// Runs the requested search to completion on the current thread, then
/// sets the cancellation flag as the terminal signal.
pub fn run(ctx: SearchContext) {
    match ctx.request.mode {
        SearchMode::Content => content_search(&ctx),
        SearchMode::FileName => file_name::run(&ctx),
        SearchMode::FolderName => folder_name::run(&ctx),
    }
    ctx.state.cancel();
}

fn content_search(ctx: &SearchContext) {
    if ctx.request.use_ripgrep {
        match which::which("rg") {
            Ok(rg) => match ripgrep::run(ctx, &rg) {
                Ok(()) => return,
                Err(e) => ctx.log(format!("{e}; falling back to native scanner.")),
            },
            Err(_) => ctx.log("ripgrep (rg) not found; falling back to native scanner."),
        }
    }
    content::run(ctx);
}

/// Include and exclude name filters shared by the native workers.
pub(crate) struct NameFilters {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl NameFilters {
    pub(crate) fn compile(request: &SearchRequest) -> Result<Self> {
        Ok(NameFilters {
            include: compile_globs(&request.include_globs)?,
            exclude: compile_globs(&request.exclude_globs)?,
        })
    }

    /// A non-empty include list must match; the exclude list must not.
    pub(crate) fn accepts_file(&self, name: &str) -> bool {
        if !self.include.is_empty() && !matches_any(name, &self.include) {
            return false;
        }
        !matches_any(name, &self.exclude)
    }

    /// Excluded directory names are neither matched nor descended into.
    pub(crate) fn excludes_dir(&self, name: &str) -> bool {
        matches_any(name, &self.exclude)
    }
}

pub(crate) fn ignore_rules(request: &SearchRequest) -> Vec<IgnoreRule> {
    if request.respect_ignore_rules {
        ignore::load_rules(&request.root)
    } else {
        Vec::new()
    }
}

/// Whether any line of `path` matches. `None` means the run was
/// cancelled mid-file; read failures are logged and count as no match.
pub(crate) fn file_contains(ctx: &SearchContext, matcher: &Matcher, path: &Path) -> Option<bool> {
    let lines = match LossyLines::open(path) {
        Ok(lines) => lines,
        Err(e) => {
            ctx.log(format!("Error reading {}: {e}", path.display()));
            return Some(false);
        }
    };
    for line in lines {
        if !ctx.checkpoint(LINE_PAUSE_POLL) {
            return None;
        }
        match line {
            Ok(line) => {
                if matcher.is_match(&line) {
                    return Some(true);
                }
            }
            Err(e) => {
                ctx.log(format!("Error reading {}: {e}", path.display()));
                return Some(false);
            }
        }
    }
    Some(false)
}
