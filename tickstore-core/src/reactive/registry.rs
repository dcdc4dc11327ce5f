//! Subscription Registry
//!
//! Owns every live subscription, keyed by id, in registration order.
//!
//! # Ordering
//!
//! The registry is backed by an `IndexMap` and removal uses `shift_remove`,
//! so iteration order is always registration order. Dispatch order, and with
//! it test expectations, is therefore deterministic.
//!
//! # Snapshots and Tombstones
//!
//! A flush never iterates the registry directly. It takes a [`snapshot`]
//! (a cheap vector of `Arc`s) and walks that instead, so callbacks are free to
//! register or unregister while the flush runs. Unregistering tombstones the
//! subscription so a snapshot that still holds it will skip it.
//!
//! [`snapshot`]: SubscriptionRegistry::snapshot

use std::sync::Arc;

use indexmap::IndexMap;

use super::subscription::{Observer, SubscriptionId, SubscriptionInfo};

/// Insertion-ordered collection of live subscriptions.
pub(crate) struct SubscriptionRegistry<V> {
    entries: IndexMap<SubscriptionId, Arc<dyn Observer<V>>>,
}

impl<V> SubscriptionRegistry<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add a subscription at the end of the dispatch order.
    pub(crate) fn insert(&mut self, observer: Arc<dyn Observer<V>>) -> SubscriptionId {
        let id = observer.id();
        self.entries.insert(id, observer);
        id
    }

    /// Remove and tombstone a subscription.
    ///
    /// Returns `false` if the id was unknown or already removed.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        match self.entries.shift_remove(&id) {
            Some(observer) => {
                observer.tombstone();
                true
            }
            None => false,
        }
    }

    /// Remove and tombstone everything.
    pub(crate) fn clear(&mut self) {
        for (_, observer) in self.entries.drain(..) {
            observer.tombstone();
        }
    }

    /// Immutable copy of the current dispatch list.
    pub(crate) fn snapshot(&self) -> Vec<Arc<dyn Observer<V>>> {
        self.entries.values().cloned().collect()
    }

    pub(crate) fn contains(&self, id: SubscriptionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn infos(&self) -> Vec<SubscriptionInfo> {
        self.entries
            .values()
            .map(|observer| SubscriptionInfo {
                id: observer.id(),
                registered_at: observer.registered_at(),
            })
            .collect()
    }
}

impl<V> Default for SubscriptionRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}
