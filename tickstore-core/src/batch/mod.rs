//! Batching
//!
//! Coalesces bursts of patches into discrete flush cycles. For N patches
//! arriving within one coalescing window exactly one flush runs downstream:
//! never zero, never more.
//!
//! The module is split in two: [`Batcher`] is a pure state machine with no
//! notion of time beyond the timestamps it is given, and [`FlushScheduler`]
//! is the seam where a timer (or nothing, in tests) is plugged in.

mod batcher;
mod scheduler;

pub use batcher::{BatchPhase, Batcher, Epoch};
pub use scheduler::{FlushScheduler, FlushTask, ManualScheduler, TokioScheduler};
