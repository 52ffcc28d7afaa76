//! A running search: a worker thread feeding two unbounded channels,
//! plus the control handles the consumer drives it with.

use crate::error::{GrepperError, Result};
use crate::progress::ProgressSnapshot;
use crate::record::MatchRecord;
use crate::request::SearchRequest;
use crate::search::{self, SearchContext};
use crate::state::ExecutionState;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Clonable control handle for a run, usable from any thread. State
/// transitions are announced on the log stream.
#[derive(Clone)]
pub struct SessionControl {
    state: Arc<ExecutionState>,
    log: Sender<String>,
}

impl SessionControl {
    pub fn pause(&self) {
        if !self.state.is_cancelled() && !self.state.is_paused() {
            self.state.pause();
            let _ = self.log.send("Paused.".into());
        }
    }

    pub fn resume(&self) {
        if self.state.is_paused() {
            self.state.resume();
            let _ = self.log.send("Resumed.".into());
        }
    }

    /// Requests cancellation. Clears any pause so blocked workers can
    /// observe the flag.
    pub fn cancel(&self) {
        if !self.state.is_cancelled() {
            let _ = self.log.send("Stopping…".into());
            self.state.cancel();
            self.state.resume();
        }
    }

    pub fn progress(&self) -> ProgressSnapshot {
        ProgressSnapshot::capture(&self.state)
    }
}

/// Handle to an in-flight search. Results and log lines accumulate in
/// unbounded channels until drained; dropping the session cancels the
/// run without waiting for it.
pub struct SearchSession {
    state: Arc<ExecutionState>,
    results: Receiver<MatchRecord>,
    logs: Receiver<String>,
    log_tx: Sender<String>,
    handle: Option<JoinHandle<()>>,
}

impl SearchSession {
    /// Spawns the worker thread and returns immediately. A failed spawn
    /// is reported on the log stream and leaves the session finished.
    pub fn start(request: SearchRequest) -> Self {
        let state = Arc::new(ExecutionState::new());
        let (result_tx, results) = unbounded();
        let (log_tx, logs) = unbounded();
        let ctx = SearchContext::new(request, Arc::clone(&state), result_tx, log_tx.clone());
        let handle = match thread::Builder::new()
            .name("grepper-worker".into())
            .spawn(move || search::run(ctx))
        {
            Ok(handle) => Some(handle),
            Err(e) => {
                let _ = log_tx.send(format!("Failed to start search thread: {e}"));
                state.cancel();
                None
            }
        };
        SearchSession {
            state,
            results,
            logs,
            log_tx,
            handle,
        }
    }

    pub fn control(&self) -> SessionControl {
        SessionControl {
            state: Arc::clone(&self.state),
            log: self.log_tx.clone(),
        }
    }

    pub fn pause(&self) {
        self.control().pause();
    }

    pub fn resume(&self) {
        self.control().resume();
    }

    pub fn cancel(&self) {
        self.control().cancel();
    }

    pub fn progress(&self) -> ProgressSnapshot {
        ProgressSnapshot::capture(&self.state)
    }

    /// Takes up to `max` pending results without blocking.
    pub fn drain_results(&self, max: usize) -> Vec<MatchRecord> {
        self.results.try_iter().take(max).collect()
    }

    /// Takes up to `max` pending log lines without blocking.
    pub fn drain_logs(&self, max: usize) -> Vec<String> {
        self.logs.try_iter().take(max).collect()
    }

    pub fn has_backlog(&self) -> bool {
        !self.results.is_empty() || !self.logs.is_empty()
    }

    /// True once the worker thread has exited. No further records or
    /// log lines can appear after this returns true, so a final drain
    /// is guaranteed complete.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Waits for the worker to exit.
    pub fn join(mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| GrepperError::Other("search worker panicked".into()))?;
        }
        Ok(())
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.state.cancel();
        self.state.resume();
    }
}
