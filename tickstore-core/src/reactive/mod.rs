//! Reactive Core
//!
//! This module turns one stream of state changes into many independently
//! gated notification channels.
//!
//! # Concepts
//!
//! ## Selectors
//!
//! A selector is a pure function from the canonical state to whatever slice
//! of it a subscriber cares about: one price, the number of symbols, a
//! constant. Subscribers depend on the selector's output, never on the state
//! as a whole.
//!
//! ## Equality Gating
//!
//! After every flush, each selector is re-run and its output compared with
//! the value the subscriber last saw. Only an unequal result triggers the
//! callback. A sidebar selecting a constant never fires, no matter how fast
//! prices tick.
//!
//! ## Dispatch
//!
//! A flush visits subscriptions in registration order against a single
//! consistent snapshot, invoking each callback at most once.
//!
//! # Implementation Notes
//!
//! Subscriptions are stored type-erased behind the `Observer` trait so that
//! selectors with different output types share one registry. All user code
//! runs under `catch_unwind`; one misbehaving subscriber cannot abort a flush.

mod dispatcher;
mod equality;
mod registry;
mod subscription;

pub use dispatcher::{FlushErrors, FlushReport};
pub use equality::{shallow_eq, structural_eq, Comparator, EqualityStrategy};
pub use subscription::{SubscriptionId, SubscriptionInfo};

pub(crate) use dispatcher::Dispatcher;
pub(crate) use registry::SubscriptionRegistry;
pub(crate) use subscription::Subscription;
