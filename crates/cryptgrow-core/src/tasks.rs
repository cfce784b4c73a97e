//! A cancellable set of tokio tasks owned by one growth session.
//!
//! The tick loop and every deferred hazard, harvest and death callback are
//! spawned through a [`TaskSet`]. [`TaskSet::cancel_all`] aborts all of
//! them at once and refuses further spawns, so nothing scheduled by a
//! discarded session can run afterwards.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::task::AbortHandle;

/// Tasks spawned on behalf of one session.
#[derive(Debug, Default)]
pub struct TaskSet {
    handles: Mutex<Vec<AbortHandle>>,
    cancelled: AtomicBool,
}

impl TaskSet {
    /// An empty, live task set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task on `runtime` and track it.
    ///
    /// Returns `false` without spawning once the set is cancelled.
    pub fn spawn<F>(&self, runtime: &Handle, future: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        if self.is_cancelled() {
            return false;
        }
        handles.retain(|h| !h.is_finished());
        let handle = runtime.spawn(future);
        handles.push(handle.abort_handle());
        true
    }

    /// Whether [`cancel_all`](Self::cancel_all) has run.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Abort every tracked task and refuse new ones. Idempotent.
    ///
    /// Returns how many still-running tasks were aborted.
    pub fn cancel_all(&self) -> usize {
        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
        self.cancelled.store(true, Ordering::Release);
        let mut aborted = 0_usize;
        for handle in handles.drain(..) {
            if !handle.is_finished() {
                handle.abort();
                aborted = aborted.saturating_add(1);
            }
        }
        aborted
    }

    /// Number of tracked tasks that have not finished.
    pub fn active(&self) -> usize {
        self.handles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }
}
