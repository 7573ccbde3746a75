//! Single-flight rebuild scheduling for watch-style callers.
//!
//! A request that arrives while a build is running is not dropped, but any
//! number of such requests collapse into one follow-up run. A failed build
//! clears the pending flag as well; the next trigger starts fresh.

use anyhow::Result;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct QueueState {
    running: bool,
    pending: bool,
}

/// Coalescing rebuild gate.
#[derive(Debug, Default)]
pub struct RebuildQueue {
    state: Mutex<QueueState>,
}

impl RebuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Ask for a build. Returns true when the caller should start one now;
    /// otherwise a follow-up run is recorded for the current builder.
    pub fn request(&self) -> bool {
        let mut state = self.lock();
        if state.running {
            state.pending = true;
            return false;
        }
        state.running = true;
        true
    }

    /// Report that the current build finished. Returns true when a follow-up
    /// run is owed (the queue stays busy), false when it is now idle.
    pub fn finish(&self, succeeded: bool) -> bool {
        let mut state = self.lock();
        if succeeded && state.pending {
            state.pending = false;
            return true;
        }
        state.running = false;
        state.pending = false;
        false
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }
}

/// Request a build and run it, plus at most one follow-up per busy period,
/// until the queue is idle.
///
/// Returns the number of runs executed (zero when another caller already
/// holds the queue, in which case a follow-up has been recorded for it).
pub fn run_coalesced<F>(queue: &RebuildQueue, mut build: F) -> Result<usize>
where
    F: FnMut() -> Result<()>,
{
    if !queue.request() {
        return Ok(0);
    }
    let mut runs = 0;
    loop {
        runs += 1;
        match build() {
            Ok(()) => {
                if !queue.finish(true) {
                    return Ok(runs);
                }
            }
            Err(err) => {
                queue.finish(false);
                return Err(err);
            }
        }
    }
}
