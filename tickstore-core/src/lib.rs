//! Tickstore Core
//!
//! This crate provides a selector-based reactive store for rapidly changing
//! shared state, such as a live price feed, observed by many independent
//! consumers. It implements:
//!
//! - Versioned, immutable state snapshots with structural sharing
//! - Trailing-edge batching of patches into flush cycles
//! - Selector subscriptions with equality-gated notification
//! - Failure isolation per subscription
//!
//! A subscriber is notified only when the slice of state its selector reads
//! has actually changed. A sidebar that selects a constant never fires; a
//! ticker row selecting one symbol ignores every other symbol's ticks.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `state`: canonical snapshots and patches
//! - `batch`: the batch state machine and flush schedulers
//! - `reactive`: subscriptions, registry, equality engine and dispatcher
//! - `store`: the facade tying them together under one lock
//! - `config`: recognized options, loadable from JSON
//!
//! # Example
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//! use tickstore_core::{CanonicalState, Patch, Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new().with_initial_state([
//!     ("SWIGGY", 450.0),
//!     ("ZOMATO", 180.0),
//!     ("ZEPTO", 320.0),
//! ]));
//!
//! let zomato_ticks = Arc::new(AtomicUsize::new(0));
//! let ticks = zomato_ticks.clone();
//! store.register(
//!     |s: &CanonicalState<f64>| s.get("ZOMATO").copied(),
//!     move |_: &Option<f64>| {
//!         ticks.fetch_add(1, Ordering::SeqCst);
//!     },
//! )?;
//!
//! // Only SWIGGY moves: the ZOMATO subscriber stays quiet.
//! store.apply_update(Patch::new().set("SWIGGY", 452.3))?;
//! store.flush_now()?;
//! assert_eq!(zomato_ticks.load(Ordering::SeqCst), 0);
//! # Ok::<(), tickstore_core::StoreError>(())
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod reactive;
pub mod state;
pub mod store;

pub use batch::{BatchPhase, FlushScheduler, ManualScheduler, TokioScheduler};
pub use config::StoreConfig;
pub use error::{Result, StoreError, SubscriptionError};
pub use reactive::{
    shallow_eq, structural_eq, Comparator, EqualityStrategy, FlushReport, SubscriptionId,
    SubscriptionInfo,
};
pub use state::{CanonicalState, Patch};
pub use store::{Store, StoreStats};
