//! Shared execution state for one search run.
//!
//! One instance is shared by the worker thread and its consumer. The
//! cancellation flag doubles as the terminal signal: the worker sets it
//! when it finishes on its own. Counters are advisory and may be read
//! mid-update.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct ExecutionState {
    cancelled: AtomicBool,
    paused: AtomicBool,
    scanned: AtomicU64,
    matched: AtomicU64,
    started: Instant,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self {
            cancelled: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            scanned: AtomicU64::new(0),
            matched: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    pub fn add_scanned(&self, n: u64) {
        self.scanned.fetch_add(n, Ordering::Relaxed);
    }

    /// Overwrites the scanned counter; used when a backend reports its
    /// own total.
    pub fn set_scanned(&self, n: u64) {
        self.scanned.store(n, Ordering::Relaxed);
    }

    pub fn scanned(&self) -> u64 {
        self.scanned.load(Ordering::Relaxed)
    }

    pub fn add_matched(&self, n: u64) {
        self.matched.fetch_add(n, Ordering::Relaxed);
    }

    pub fn matched(&self) -> u64 {
        self.matched.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Blocks while paused, polling at `poll`. Returns `false` once the
    /// run is cancelled.
    pub fn wait_if_paused(&self, poll: Duration) -> bool {
        while self.is_paused() {
            if self.is_cancelled() {
                return false;
            }
            std::thread::sleep(poll);
        }
        !self.is_cancelled()
    }
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self::new()
    }
}
