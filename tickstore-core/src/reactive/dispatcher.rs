//! Notification Dispatcher
//!
//! Drives a single flush: recompute, compare, notify.
//!
//! # Algorithm
//!
//! 1. The caller hands over a snapshot of the registry and one
//!    [`CanonicalState`]. Every subscription in the pass sees that same state.
//! 2. Each subscription is visited in registration order. Tombstoned entries
//!    (unregistered after the snapshot was taken) are skipped.
//! 3. A visit evaluates the selector, asks the comparator, and invokes the
//!    callback if the value changed. Failures are caught per subscription and
//!    collected; they never stop the pass.
//! 4. Once every entry has been visited, staged values are committed.
//!
//! The dispatcher holds no locks and knows nothing about batching; the store
//! decides when a pass runs.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::debug;

use super::subscription::{Observer, SubscriptionId, Visit};
use crate::error::SubscriptionError;
use crate::state::CanonicalState;

/// Failures collected during one pass.
pub type FlushErrors = SmallVec<[SubscriptionError; 2]>;

/// Outcome of one dispatch pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Version of the snapshot every selector saw.
    pub version: u64,

    /// Subscriptions whose selector was evaluated.
    pub visited: usize,

    /// Subscriptions skipped because they were unregistered mid-pass.
    pub skipped: usize,

    /// Subscriptions whose callback was invoked, in invocation order.
    pub notified: Vec<SubscriptionId>,

    /// Isolated per-subscription failures.
    pub errors: FlushErrors,
}

impl FlushReport {
    /// Whether the given subscription was notified in this pass.
    pub fn was_notified(&self, id: SubscriptionId) -> bool {
        self.notified.contains(&id)
    }
}

/// Stateless driver for one flush.
pub(crate) struct Dispatcher;

impl Dispatcher {
    /// Run one pass over `observers` against `state`.
    pub(crate) fn run<V>(
        observers: &[Arc<dyn Observer<V>>],
        state: &CanonicalState<V>,
    ) -> FlushReport {
        let mut report = FlushReport {
            version: state.version(),
            ..FlushReport::default()
        };

        for observer in observers {
            if observer.is_tombstoned() {
                report.skipped += 1;
                continue;
            }

            report.visited += 1;
            if observer.visit(state, &mut report.errors) == Visit::Notified {
                report.notified.push(observer.id());
            }
        }

        for observer in observers {
            observer.commit();
        }

        debug!(
            version = report.version,
            visited = report.visited,
            skipped = report.skipped,
            notified = report.notified.len(),
            errors = report.errors.len(),
            "flush complete"
        );

        report
    }
}
