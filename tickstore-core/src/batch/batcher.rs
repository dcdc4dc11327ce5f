//! Batch State Machine
//!
//! Tracks the one live batch of a store:
//!
//! ```text
//! idle --(patch)--> accumulating --(window elapses | flush_now)--> flushing --(done)--> idle
//! ```
//!
//! Only the first patch of an idle batch asks for a flush to be scheduled.
//! Later patches in the same window are absorbed. Patches that arrive while a
//! flush is running roll into the next batch, which is armed as soon as the
//! running flush finishes.
//!
//! Every batch gets a fresh epoch. A scheduled flush carries the epoch it was
//! scheduled for, so a timer that fires after its batch was already flushed
//! manually cannot cut the next batch's window short.

use std::time::Instant;

use serde::Serialize;

/// Phase of the live batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPhase {
    Idle,
    Accumulating,
    Flushing,
}

/// Identifies one batch for scheduling purposes.
pub type Epoch = u64;

/// The batch state machine.
#[derive(Debug)]
pub struct Batcher {
    phase: BatchPhase,

    /// When the current batch's first patch arrived.
    pending_since: Option<Instant>,

    /// Epoch of the current (or most recent) batch.
    epoch: Epoch,

    /// First patch that arrived while flushing; arms a new batch afterwards.
    rearm: Option<Instant>,
}

impl Batcher {
    pub fn new() -> Self {
        Self {
            phase: BatchPhase::Idle,
            pending_since: None,
            epoch: 0,
            rearm: None,
        }
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn pending_since(&self) -> Option<Instant> {
        self.pending_since
    }

    /// Record that a patch was applied.
    ///
    /// Returns the epoch to schedule a flush for if this patch opened a new
    /// batch, or `None` if it was absorbed.
    pub fn mark_dirty(&mut self, now: Instant) -> Option<Epoch> {
        match self.phase {
            BatchPhase::Idle => Some(self.arm(now)),
            BatchPhase::Accumulating => None,
            BatchPhase::Flushing => {
                self.rearm.get_or_insert(now);
                None
            }
        }
    }

    /// Begin flushing the current batch.
    ///
    /// `expected` restricts the flush to a specific epoch; a scheduled flush
    /// passes its own, `flush_now` passes `None`. Returns `false` if there is
    /// nothing to flush, the epoch is stale, or a flush is already running.
    pub fn begin_flush(&mut self, expected: Option<Epoch>) -> bool {
        if self.phase != BatchPhase::Accumulating {
            return false;
        }
        if expected.is_some_and(|epoch| epoch != self.epoch) {
            return false;
        }

        self.phase = BatchPhase::Flushing;
        self.pending_since = None;
        true
    }

    /// Finish the running flush.
    ///
    /// Returns the epoch of a freshly armed batch if patches arrived during
    /// the flush; the caller must schedule it. The new batch is pending since
    /// the first of those patches. A batch that was reset while flushing stays
    /// idle.
    pub fn finish_flush(&mut self) -> Option<Epoch> {
        if self.phase != BatchPhase::Flushing {
            return None;
        }
        self.phase = BatchPhase::Idle;

        self.rearm.take().map(|since| self.arm(since))
    }

    /// Drop any pending batch. Used on disposal.
    pub fn reset(&mut self) {
        self.phase = BatchPhase::Idle;
        self.pending_since = None;
        self.rearm = None;
    }

    fn arm(&mut self, now: Instant) -> Epoch {
        self.epoch += 1;
        self.phase = BatchPhase::Accumulating;
        self.pending_since = Some(now);
        self.epoch
    }
}

impl Default for Batcher {
    fn default() -> Self {
        Self::new()
    }
}
