//! Flush Scheduling
//!
//! The batcher decides *that* a flush is needed; a [`FlushScheduler`] decides
//! *when* it runs. The coalescing unit is a deployment choice:
//!
//! - [`ManualScheduler`] never runs anything on its own. Flushes happen only
//!   through `Store::flush_now`, which makes tests fully deterministic.
//! - [`TokioScheduler`] spawns a task that sleeps for the window and then
//!   flushes.
//!
//! A scheduled flush only holds a weak reference to the store, so a pending
//! timer never keeps a dropped store alive.

use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::{Result, StoreError};

/// A deferred flush for one batch.
pub type FlushTask = Box<dyn FnOnce() + Send + 'static>;

/// Runs a flush task once the coalescing window has elapsed.
pub trait FlushScheduler: Send + Sync {
    /// Arrange for `task` to run after `window`.
    fn schedule(&self, window: Duration, task: FlushTask);
}

/// Scheduler that never fires. Drive flushes with `flush_now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualScheduler;

impl FlushScheduler for ManualScheduler {
    fn schedule(&self, _window: Duration, _task: FlushTask) {}
}

/// Scheduler backed by a tokio runtime timer.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Use the given runtime.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on.
    pub fn try_current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| StoreError::Runtime(e.to_string()))
    }
}

impl FlushScheduler for TokioScheduler {
    fn schedule(&self, window: Duration, task: FlushTask) {
        self.handle.spawn(async move {
            tokio::time::sleep(window).await;
            task();
        });
    }
}
