//! State Store
//!
//! The [`Store`] is the entry point: it owns the canonical state, the batch,
//! and the subscription registry, and coordinates them.
//!
//! # How It Works
//!
//! 1. A feed calls [`Store::apply_update`]. The patch is merged into a new
//!    snapshot with `version + 1` and the batch is marked dirty. If that opened
//!    a new batch, a flush is handed to the scheduler.
//!
//! 2. When the window elapses (or [`Store::flush_now`] is called) the batch
//!    moves to flushing. The registry and state are snapshotted and the
//!    dispatcher runs one pass over them.
//!
//! 3. Per-subscription failures from the pass are logged and handed to the
//!    error handler installed with [`Store::on_error`], after the pass.
//!
//! # Thread Safety
//!
//! All mutation and every flush pass are serialized behind one store-wide
//! re-entrant lock, held for the whole of `apply_update` and of each pass.
//! The lock is re-entrant so that callbacks, which run inside a pass, can
//! call back into the store on the same thread: unregistering themselves,
//! reading the snapshot, or applying a patch (which rolls into the next
//! batch). Internal state sits in a `RefCell` that is never borrowed while
//! user code runs.
//!
//! Error handlers installed with [`Store::on_error`] also run with the lock
//! held, right after the pass. Neither a callback nor a handler may block on
//! another thread that is itself waiting on the same store.

use std::cell::RefCell;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::ReentrantMutex;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::batch::{BatchPhase, Batcher, Epoch, FlushScheduler, ManualScheduler, TokioScheduler};
use crate::config::StoreConfig;
use crate::error::{Result, StoreError, SubscriptionError};
use crate::reactive::{
    Comparator, Dispatcher, EqualityStrategy, FlushReport, Subscription, SubscriptionId,
    SubscriptionInfo, SubscriptionRegistry,
};
use crate::state::{CanonicalState, Patch};

/// Observer-supplied channel for isolated subscription failures.
type ErrorHandler = Arc<dyn Fn(&SubscriptionError) + Send + Sync>;

/// Running counters for a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Patches merged into the state.
    pub patches_applied: u64,

    /// Dispatch passes completed.
    pub flushes: u64,

    /// Callback invocations across all passes.
    pub notifications: u64,

    /// Subscription failures reported.
    pub errors: u64,
}

/// Mutable store state, guarded by the store-wide lock.
struct Core<V> {
    state: CanonicalState<V>,
    batcher: Batcher,
    registry: SubscriptionRegistry<V>,
    error_handler: Option<ErrorHandler>,
    stats: StoreStats,
    disposed: bool,
}

struct Shared<V> {
    core: ReentrantMutex<RefCell<Core<V>>>,
    scheduler: Arc<dyn FlushScheduler>,
    window: Duration,
    default_comparator: EqualityStrategy,
}

/// A selector-gated reactive store.
///
/// `Store` is a cheap handle; clones share the same state. Pass it to
/// whichever component needs it rather than reaching for a global.
///
/// # Example
///
/// ```rust
/// use std::sync::{Arc, Mutex};
/// use tickstore_core::{Patch, Store, StoreConfig};
///
/// let store = Store::new(
///     StoreConfig::new().with_initial_state([("SWIGGY", 450.0), ("ZOMATO", 180.0)]),
/// );
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_clone = seen.clone();
/// store
///     .register(
///         |s| s.get("SWIGGY").copied(),
///         move |price: &Option<f64>| seen_clone.lock().unwrap().push(*price),
///     )
///     .unwrap();
///
/// store.apply_update(Patch::new().set("ZOMATO", 181.0)).unwrap();
/// store.apply_update(Patch::new().set("SWIGGY", 452.3)).unwrap();
/// store.flush_now().unwrap();
///
/// assert_eq!(*seen.lock().unwrap(), vec![Some(452.3)]);
/// ```
pub struct Store<V> {
    shared: Arc<Shared<V>>,
}

impl<V> Store<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a store that only flushes through [`flush_now`](Self::flush_now).
    pub fn new(config: StoreConfig<V>) -> Self {
        Self::with_scheduler(config, Arc::new(ManualScheduler))
    }

    /// Create a store whose batches are flushed by a tokio timer on the
    /// current runtime.
    pub fn with_tokio(config: StoreConfig<V>) -> Result<Self> {
        let scheduler = TokioScheduler::try_current()?;
        Ok(Self::with_scheduler(config, Arc::new(scheduler)))
    }

    /// Create a store with a custom flush scheduler.
    pub fn with_scheduler(config: StoreConfig<V>, scheduler: Arc<dyn FlushScheduler>) -> Self {
        let window = config.window();
        let core = Core {
            state: CanonicalState::new(config.initial_state),
            batcher: Batcher::new(),
            registry: SubscriptionRegistry::new(),
            error_handler: None,
            stats: StoreStats::default(),
            disposed: false,
        };

        debug!(window_ms = config.window_ms, keys = core.state.len(), "store created");

        Self {
            shared: Arc::new(Shared {
                core: ReentrantMutex::new(RefCell::new(core)),
                scheduler,
                window,
                default_comparator: config.default_comparator,
            }),
        }
    }

    /// Merge `patch` into the state and mark the batch dirty.
    ///
    /// Returns the new version.
    pub fn apply_update(&self, patch: Patch<V>) -> Result<u64> {
        let guard = self.shared.core.lock();
        let (version, epoch) = {
            let mut core = guard.borrow_mut();
            if core.disposed {
                return Err(StoreError::Disposed);
            }

            let changed = patch.len();
            let next = core.state.apply(patch);
            core.state = next;
            core.stats.patches_applied += 1;

            let version = core.state.version();
            debug!(version, changed, "patch applied");
            (version, core.batcher.mark_dirty(Instant::now()))
        };

        if let Some(epoch) = epoch {
            self.schedule(epoch);
        }

        Ok(version)
    }

    /// The latest fully applied state.
    pub fn get_snapshot(&self) -> CanonicalState<V> {
        let guard = self.shared.core.lock();
        let state = guard.borrow().state.clone();
        state
    }

    /// Register a subscription using the store's default comparator.
    ///
    /// The selector is evaluated immediately to seed the last seen value; the
    /// callback is not invoked until that value changes.
    pub fn register<T, S, C>(&self, selector: S, callback: C) -> Result<SubscriptionId>
    where
        T: PartialEq + Send + 'static,
        S: Fn(&CanonicalState<V>) -> T + Send + Sync + 'static,
        C: Fn(&T) + Send + Sync + 'static,
    {
        let comparator = self.shared.default_comparator.comparator();
        self.register_with(selector, callback, comparator)
    }

    /// Register a subscription with a custom comparator.
    pub fn register_with<T, S, C>(
        &self,
        selector: S,
        callback: C,
        comparator: Comparator<T>,
    ) -> Result<SubscriptionId>
    where
        T: Send + 'static,
        S: Fn(&CanonicalState<V>) -> T + Send + Sync + 'static,
        C: Fn(&T) + Send + Sync + 'static,
    {
        let guard = self.shared.core.lock();
        let state = {
            let core = guard.borrow();
            if core.disposed {
                return Err(StoreError::Disposed);
            }
            core.state.clone()
        };

        let (subscription, error) = Subscription::new(&state, selector, comparator, callback);

        let id = {
            let mut core = guard.borrow_mut();
            // The selector may have disposed the store.
            if core.disposed {
                return Err(StoreError::Disposed);
            }
            core.registry.insert(Arc::new(subscription))
        };

        debug!(subscription = %id, version = state.version(), "subscription registered");
        if let Some(error) = error {
            self.report(&[error]);
        }

        Ok(id)
    }

    /// Remove a subscription.
    ///
    /// Unknown or already removed ids are ignored. Safe to call from inside a
    /// callback: a subscription removed mid-flush is not visited again, even
    /// by the flush in progress.
    pub fn unregister(&self, id: SubscriptionId) {
        let guard = self.shared.core.lock();
        let removed = guard.borrow_mut().registry.remove(id);
        if removed {
            debug!(subscription = %id, "subscription unregistered");
        }
    }

    /// Flush the pending batch synchronously.
    ///
    /// Returns `Ok(None)` if nothing is pending, or if called from inside a
    /// running flush (flushes never overlap).
    pub fn flush_now(&self) -> Result<Option<FlushReport>> {
        self.flush(None)
    }

    /// Tear the store down.
    ///
    /// All subscriptions are dropped and any pending batch is discarded.
    /// Later calls to `apply_update`, `register` and `flush_now` fail with
    /// [`StoreError::Disposed`]; `unregister` stays a no-op.
    pub fn dispose(&self) {
        let guard = self.shared.core.lock();
        let mut core = guard.borrow_mut();
        if core.disposed {
            return;
        }

        core.disposed = true;
        core.registry.clear();
        core.batcher.reset();
        debug!(version = core.state.version(), "store disposed");
    }

    /// Install the error channel for isolated subscription failures.
    ///
    /// The handler runs after a flush pass completes, once per failure.
    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&SubscriptionError) + Send + Sync + 'static,
    {
        let guard = self.shared.core.lock();
        guard.borrow_mut().error_handler = Some(Arc::new(handler));
    }

    pub fn is_disposed(&self) -> bool {
        let guard = self.shared.core.lock();
        let disposed = guard.borrow().disposed;
        disposed
    }

    pub fn version(&self) -> u64 {
        let guard = self.shared.core.lock();
        let version = guard.borrow().state.version();
        version
    }

    pub fn batch_phase(&self) -> BatchPhase {
        let guard = self.shared.core.lock();
        let phase = guard.borrow().batcher.phase();
        phase
    }

    /// When the pending batch's first patch arrived, or `None` if idle.
    pub fn pending_since(&self) -> Option<Instant> {
        let guard = self.shared.core.lock();
        let since = guard.borrow().batcher.pending_since();
        since
    }

    pub fn subscription_count(&self) -> usize {
        let guard = self.shared.core.lock();
        let count = guard.borrow().registry.len();
        count
    }

    pub fn is_registered(&self, id: SubscriptionId) -> bool {
        let guard = self.shared.core.lock();
        let registered = guard.borrow().registry.contains(id);
        registered
    }

    /// Live subscriptions in registration order.
    pub fn subscriptions(&self) -> Vec<SubscriptionInfo> {
        let guard = self.shared.core.lock();
        let infos = guard.borrow().registry.infos();
        infos
    }

    pub fn stats(&self) -> StoreStats {
        let guard = self.shared.core.lock();
        let stats = guard.borrow().stats;
        stats
    }

    /// Hand a flush for `epoch` to the scheduler.
    fn schedule(&self, epoch: Epoch) {
        let weak = Arc::downgrade(&self.shared);
        trace!(epoch, window_ms = self.shared.window.as_millis() as u64, "flush scheduled");

        self.shared.scheduler.schedule(
            self.shared.window,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    let store = Store { shared };
                    if let Err(error) = store.flush(Some(epoch)) {
                        trace!(epoch, %error, "scheduled flush skipped");
                    }
                }
            }),
        );
    }

    /// Run one flush pass if the batch (optionally of a given epoch) is pending.
    fn flush(&self, expected: Option<Epoch>) -> Result<Option<FlushReport>> {
        let guard = self.shared.core.lock();
        let (observers, state) = {
            let mut core = guard.borrow_mut();
            if core.disposed {
                return Err(StoreError::Disposed);
            }
            if !core.batcher.begin_flush(expected) {
                return Ok(None);
            }
            (core.registry.snapshot(), core.state.clone())
        };

        let report = Dispatcher::run(&observers, &state);

        let rearmed = {
            let mut core = guard.borrow_mut();
            core.stats.flushes += 1;
            core.stats.notifications += report.notified.len() as u64;
            core.batcher.finish_flush()
        };

        if let Some(epoch) = rearmed {
            self.schedule(epoch);
        }
        self.report(&report.errors);

        Ok(Some(report))
    }

    /// Log failures and pass them to the error handler.
    fn report(&self, errors: &[SubscriptionError]) {
        if errors.is_empty() {
            return;
        }

        let guard = self.shared.core.lock();
        let handler = {
            let mut core = guard.borrow_mut();
            core.stats.errors += errors.len() as u64;
            core.error_handler.clone()
        };

        for error in errors {
            warn!(subscription = %error.id(), %error, "subscription failed");
            if let Some(handler) = &handler {
                if catch_unwind(AssertUnwindSafe(|| handler(error))).is_err() {
                    warn!(subscription = %error.id(), "error handler panicked");
                }
            }
        }
    }
}

impl<V> Clone for Store<V> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<V> fmt::Debug for Store<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (version, subscriptions, phase, disposed) = {
            let guard = self.shared.core.lock();
            let core = guard.borrow();
            (
                core.state.version(),
                core.registry.len(),
                core.batcher.phase(),
                core.disposed,
            )
        };

        f.debug_struct("Store")
            .field("version", &version)
            .field("subscriptions", &subscriptions)
            .field("phase", &phase)
            .field("disposed", &disposed)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, Ordering};

    use parking_lot::Mutex;

    fn dashboard() -> Store<f64> {
        Store::new(StoreConfig::new().with_initial_state([
            ("SWIGGY", 450.0),
            ("ZOMATO", 180.0),
            ("ZEPTO", 320.0),
        ]))
    }

    fn price(symbol: &'static str) -> impl Fn(&CanonicalState<f64>) -> f64 + Send + Sync + 'static {
        move |s: &CanonicalState<f64>| s.get(symbol).copied().unwrap_or_default()
    }

    #[test]
    fn apply_update_bumps_version() {
        let store = dashboard();
        assert_eq!(store.version(), 0);

        assert_eq!(store.apply_update(Patch::new().set("SWIGGY", 452.3)).unwrap(), 1);
        assert_eq!(store.apply_update(Patch::new()).unwrap(), 2);
        assert_eq!(store.get_snapshot().get("SWIGGY"), Some(&452.3));
        assert_eq!(store.stats().patches_applied, 2);
    }

    #[test]
    fn register_does_not_notify() {
        let store = dashboard();
        let count = Arc::new(AtomicI32::new(0));
        let count_clone = count.clone();

        store
            .register(price("SWIGGY"), move |_: &f64| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(store.subscription_count(), 1);
    }

    #[test]
    fn batch_phase_follows_state_machine() {
        let store = dashboard();
        assert_eq!(store.batch_phase(), BatchPhase::Idle);

        store.apply_update(Patch::new().set("SWIGGY", 1.0)).unwrap();
        assert_eq!(store.batch_phase(), BatchPhase::Accumulating);

        let observed = Arc::new(Mutex::new(None));
        let observed_clone = observed.clone();
        let handle = store.clone();
        store
            .register(price("SWIGGY"), move |_: &f64| {
                *observed_clone.lock() = Some(handle.batch_phase());
            })
            .unwrap();
        store.apply_update(Patch::new().set("SWIGGY", 2.0)).unwrap();

        store.flush_now().unwrap();
        assert_eq!(*observed.lock(), Some(BatchPhase::Flushing));
        assert_eq!(store.batch_phase(), BatchPhase::Idle);
    }

    #[test]
    fn pending_since_tracks_the_batch_start() {
        let store = dashboard();
        assert!(store.pending_since().is_none());

        let before = Instant::now();
        store.apply_update(Patch::new().set("SWIGGY", 1.0)).unwrap();
        let opened = store.pending_since().unwrap();
        assert!(opened >= before);

        // Absorbed patches do not move the start of the batch.
        store.apply_update(Patch::new().set("SWIGGY", 2.0)).unwrap();
        assert_eq!(store.pending_since(), Some(opened));

        let window = Arc::new(Mutex::new(None));
        let window_clone = window.clone();
        let handle = store.clone();
        store
            .register(price("ZOMATO"), move |_: &f64| {
                let start = Instant::now();
                handle.apply_update(Patch::new().set("ZEPTO", 321.0)).unwrap();
                *window_clone.lock() = Some((start, Instant::now()));
            })
            .unwrap();
        store.apply_update(Patch::new().set("ZOMATO", 181.0)).unwrap();
        store.flush_now().unwrap();

        // The rearmed batch is pending since the patch applied mid-flush.
        let recorded = *window.lock();
        let (start, end) = recorded.unwrap();
        let rearmed = store.pending_since().unwrap();
        assert!(rearmed >= start && rearmed <= end);

        store.flush_now().unwrap();
        assert!(store.pending_since().is_none());
    }

    #[test]
    fn flush_now_when_idle_is_a_no_op() {
        let store = dashboard();
        assert!(store.flush_now().unwrap().is_none());
        assert_eq!(store.stats().flushes, 0);
    }

    #[test]
    fn nested_flush_now_does_not_overlap() {
        let store = dashboard();
        let nested = Arc::new(Mutex::new(None));
        let nested_clone = nested.clone();
        let handle = store.clone();

        store
            .register(price("SWIGGY"), move |_: &f64| {
                *nested_clone.lock() = Some(handle.flush_now().unwrap().is_none());
            })
            .unwrap();

        store.apply_update(Patch::new().set("SWIGGY", 1.0)).unwrap();
        store.flush_now().unwrap();

        assert_eq!(*nested.lock(), Some(true));
        assert_eq!(store.stats().flushes, 1);
    }

    #[test]
    fn patch_from_callback_rolls_into_next_batch() {
        let store = dashboard();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let handle = store.clone();

        store
            .register(price("SWIGGY"), move |p: &f64| {
                seen_clone.lock().push(*p);
                if *p < 500.0 {
                    handle.apply_update(Patch::new().set("SWIGGY", 500.0)).unwrap();
                }
            })
            .unwrap();

        store.apply_update(Patch::new().set("SWIGGY", 452.3)).unwrap();
        let first = store.flush_now().unwrap().unwrap();
        assert_eq!(first.version, 1);
        assert_eq!(*seen.lock(), vec![452.3]);

        // The patch applied during the first flush armed a new batch.
        assert_eq!(store.batch_phase(), BatchPhase::Accumulating);
        let second = store.flush_now().unwrap().unwrap();
        assert_eq!(second.version, 2);
        assert_eq!(*seen.lock(), vec![452.3, 500.0]);
    }

    #[test]
    fn dispose_is_terminal() {
        let store = dashboard();
        let id = store.register(price("SWIGGY"), |_: &f64| {}).unwrap();
        store.apply_update(Patch::new().set("SWIGGY", 1.0)).unwrap();

        store.dispose();
        store.dispose();

        assert!(store.is_disposed());
        assert_eq!(store.subscription_count(), 0);
        assert_eq!(store.batch_phase(), BatchPhase::Idle);
        assert!(matches!(
            store.apply_update(Patch::new()),
            Err(StoreError::Disposed)
        ));
        assert!(matches!(
            store.register(price("SWIGGY"), |_: &f64| {}),
            Err(StoreError::Disposed)
        ));
        assert!(matches!(store.flush_now(), Err(StoreError::Disposed)));

        // Still a no-op.
        store.unregister(id);
    }

    #[test]
    fn dispose_from_callback_stops_the_pass() {
        let store = dashboard();
        let count = Arc::new(AtomicI32::new(0));
        let handle = store.clone();

        store
            .register(price("SWIGGY"), move |_: &f64| handle.dispose())
            .unwrap();
        let count_clone = count.clone();
        store
            .register(price("SWIGGY"), move |_: &f64| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        store.apply_update(Patch::new().set("SWIGGY", 1.0)).unwrap();
        let report = store.flush_now().unwrap().unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(store.batch_phase(), BatchPhase::Idle);
    }

    #[test]
    fn errors_reach_handler_after_pass() {
        let store = dashboard();
        let reported = Arc::new(Mutex::new(Vec::new()));
        let reported_clone = reported.clone();
        store.on_error(move |e| reported_clone.lock().push(e.clone()));

        let id = store
            .register(
                |s: &CanonicalState<f64>| {
                    if s.version() > 0 {
                        panic!("selector failed");
                    }
                    0
                },
                |_: &i32| {},
            )
            .unwrap();

        store.apply_update(Patch::new()).unwrap();
        let report = store.flush_now().unwrap().unwrap();

        assert_eq!(report.errors.len(), 1);
        assert_eq!(*reported.lock(), report.errors.to_vec());
        assert_eq!(reported.lock()[0].id(), id);
        assert_eq!(store.stats().errors, 1);
    }

    #[test]
    fn selector_failure_at_registration_is_reported() {
        let store = dashboard();
        let reported = Arc::new(AtomicI32::new(0));
        let reported_clone = reported.clone();
        store.on_error(move |_| {
            reported_clone.fetch_add(1, Ordering::SeqCst);
        });

        let result = store.register(
            |_: &CanonicalState<f64>| -> f64 { panic!("not ready") },
            |_: &f64| {},
        );

        assert!(result.is_ok());
        assert_eq!(reported.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn error_handler_may_call_back_into_store() {
        let store = dashboard();
        let phases = Arc::new(Mutex::new(Vec::new()));
        let phases_clone = phases.clone();
        let handle = store.clone();
        store.on_error(move |e| {
            phases_clone.lock().push(handle.batch_phase());
            handle.unregister(e.id());
        });

        let id = store
            .register(
                |s: &CanonicalState<f64>| {
                    assert_eq!(s.version(), 0, "only version zero is supported");
                    0
                },
                |_: &i32| {},
            )
            .unwrap();

        store.apply_update(Patch::new()).unwrap();
        store.flush_now().unwrap();

        // The handler ran once the pass was over and could unregister.
        assert_eq!(*phases.lock(), vec![BatchPhase::Idle]);
        assert!(!store.is_registered(id));
    }

    #[test]
    fn panicking_error_handler_is_contained() {
        let store = dashboard();
        store.on_error(|_| panic!("handler exploded"));
        store
            .register(
                |s: &CanonicalState<f64>| {
                    assert_eq!(s.version(), 0, "only version zero is supported");
                    0
                },
                |_: &i32| {},
            )
            .unwrap();

        store.apply_update(Patch::new()).unwrap();
        let report = store.flush_now().unwrap().unwrap();
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn always_notify_strategy_notifies_every_flush() {
        let store: Store<f64> = Store::new(
            StoreConfig::new()
                .with_initial_state([("SWIGGY", 450.0)])
                .with_default_comparator(EqualityStrategy::AlwaysNotify),
        );
        let count = Arc::new(AtomicI32::new(0));
        let count_clone = count.clone();
        store
            .register(|_: &CanonicalState<f64>| "links", move |_: &&str| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        store.apply_update(Patch::new()).unwrap();
        store.flush_now().unwrap();
        store.apply_update(Patch::new()).unwrap();
        store.flush_now().unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn subscriptions_listed_in_registration_order() {
        let store = dashboard();
        let a = store.register(price("SWIGGY"), |_: &f64| {}).unwrap();
        let b = store.register(price("ZOMATO"), |_: &f64| {}).unwrap();
        let c = store.register(price("ZEPTO"), |_: &f64| {}).unwrap();
        store.unregister(b);

        let ids: Vec<_> = store.subscriptions().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn clones_share_state() {
        let store = dashboard();
        let other = store.clone();

        other.apply_update(Patch::new().set("ZEPTO", 321.0)).unwrap();
        assert_eq!(store.get_snapshot().get("ZEPTO"), Some(&321.0));
        assert!(format!("{store:?}").contains("version: 1"));
    }
}
