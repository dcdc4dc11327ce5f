//! Subscriptions
//!
//! A subscription pairs a selector (state to derived value) with a callback
//! and remembers the last value the callback saw. The registering observer
//! only ever holds the opaque [`SubscriptionId`]; the subscription itself is
//! owned by the registry.
//!
//! # Staging
//!
//! During a flush a changed value is staged, not written to `last` directly.
//! The dispatcher commits all staged values once the pass is complete, so the
//! remembered value always reflects the most recently completed flush.
//!
//! # Failure Isolation
//!
//! Selectors, comparators and callbacks are user code. Each invocation is
//! wrapped in `catch_unwind`; a panic becomes a [`SubscriptionError`] pushed
//! onto the flush's error list and evaluation moves on.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use tracing::trace;

use super::dispatcher::FlushErrors;
use super::equality::{compare, Comparator};
use crate::error::{panic_message, SubscriptionError};
use crate::state::CanonicalState;

/// Opaque handle identifying a subscription.
///
/// Holding an id grants nothing but the ability to unregister. Ids are unique
/// across every store in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Generate a new unique subscription ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Public description of a live subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionInfo {
    pub id: SubscriptionId,
    pub registered_at: Instant,
}

/// Result of visiting one subscription during a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visit {
    /// Selector result compared equal; callback not invoked.
    Unchanged,
    /// Callback was invoked (even if it then panicked).
    Notified,
    /// Selector panicked; nothing was compared or delivered.
    Failed,
}

/// Type-erased view of a subscription, as stored by the registry.
pub(crate) trait Observer<V>: Send + Sync {
    fn id(&self) -> SubscriptionId;

    fn registered_at(&self) -> Instant;

    /// Mark as unregistered. Any flush that has not reached it yet skips it.
    fn tombstone(&self);

    fn is_tombstoned(&self) -> bool;

    /// Evaluate against `state`, notifying the callback if the value changed.
    fn visit(&self, state: &CanonicalState<V>, errors: &mut FlushErrors) -> Visit;

    /// Promote the staged value, if any, to the last seen value.
    fn commit(&self);
}

type Selector<V, T> = Box<dyn Fn(&CanonicalState<V>) -> T + Send + Sync>;
type Callback<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Per-subscription value bookkeeping.
struct Slot<T> {
    /// Value as of the last completed flush. `None` means unset.
    last: Option<T>,

    /// Value delivered during the flush in progress.
    staged: Option<T>,

    /// Set after a selector failure so the next successful evaluation
    /// notifies regardless of equality.
    stale: bool,
}

/// A typed subscription.
pub(crate) struct Subscription<V, T> {
    id: SubscriptionId,
    registered_at: Instant,
    selector: Selector<V, T>,
    comparator: Comparator<T>,
    callback: Callback<T>,
    slot: Mutex<Slot<T>>,
    tombstoned: AtomicBool,
}

impl<V, T> Subscription<V, T>
where
    T: Send + 'static,
{
    /// Create a subscription and seed its last value from `state`.
    ///
    /// The callback is not invoked. If the selector panics the last value is
    /// left unset and the error is returned alongside the subscription.
    pub(crate) fn new<S, C>(
        state: &CanonicalState<V>,
        selector: S,
        comparator: Comparator<T>,
        callback: C,
    ) -> (Self, Option<SubscriptionError>)
    where
        S: Fn(&CanonicalState<V>) -> T + Send + Sync + 'static,
        C: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let (last, error) = match catch_unwind(AssertUnwindSafe(|| selector(state))) {
            Ok(value) => (Some(value), None),
            Err(payload) => (
                None,
                Some(SubscriptionError::Selector {
                    id,
                    message: panic_message(payload),
                }),
            ),
        };

        let subscription = Self {
            id,
            registered_at: Instant::now(),
            selector: Box::new(selector),
            comparator,
            callback: Box::new(callback),
            slot: Mutex::new(Slot {
                stale: last.is_none(),
                last,
                staged: None,
            }),
            tombstoned: AtomicBool::new(false),
        };

        (subscription, error)
    }

    /// Decide whether `value` differs from what the subscriber last saw.
    fn changed(&self, value: &T, errors: &mut FlushErrors) -> bool {
        let slot = self.slot.lock();
        if slot.stale {
            return true;
        }

        match &slot.last {
            None => true,
            Some(last) => match compare(&self.comparator, last, value) {
                Ok(equal) => !equal,
                Err(message) => {
                    errors.push(SubscriptionError::Comparator {
                        id: self.id,
                        message,
                    });
                    true
                }
            },
        }
    }
}

impl<V, T> Observer<V> for Subscription<V, T>
where
    V: Send + Sync,
    T: Send + 'static,
{
    fn id(&self) -> SubscriptionId {
        self.id
    }

    fn registered_at(&self) -> Instant {
        self.registered_at
    }

    fn tombstone(&self) {
        self.tombstoned.store(true, Ordering::Release);
    }

    fn is_tombstoned(&self) -> bool {
        self.tombstoned.load(Ordering::Acquire)
    }

    fn visit(&self, state: &CanonicalState<V>, errors: &mut FlushErrors) -> Visit {
        let value = match catch_unwind(AssertUnwindSafe(|| (self.selector)(state))) {
            Ok(value) => value,
            Err(payload) => {
                self.slot.lock().stale = true;
                errors.push(SubscriptionError::Selector {
                    id: self.id,
                    message: panic_message(payload),
                });
                return Visit::Failed;
            }
        };

        if !self.changed(&value, errors) {
            trace!(subscription = %self.id, "selector result unchanged");
            return Visit::Unchanged;
        }

        trace!(subscription = %self.id, version = state.version(), "notifying");
        let delivered = catch_unwind(AssertUnwindSafe(|| (self.callback)(&value)));

        {
            let mut slot = self.slot.lock();
            slot.staged = Some(value);
            slot.stale = false;
        }

        if let Err(payload) = delivered {
            errors.push(SubscriptionError::Callback {
                id: self.id,
                message: panic_message(payload),
            });
        }

        Visit::Notified
    }

    fn commit(&self) {
        let mut slot = self.slot.lock();
        if let Some(value) = slot.staged.take() {
            slot.last = Some(value);
        }
    }
}
