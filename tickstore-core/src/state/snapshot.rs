//! Canonical State
//!
//! A [`CanonicalState`] is an immutable snapshot of the store: a mapping from
//! symbol to value plus a version number.
//!
//! # Structural Sharing
//!
//! The entries live behind an `Arc`. Cloning a snapshot is a reference count
//! bump, and applying a patch goes through `Arc::make_mut`, which copies the
//! map only if somebody else (typically a flush in progress) still holds the
//! previous snapshot. A snapshot that has been handed out is never mutated.

use std::sync::Arc;

use indexmap::IndexMap;

use super::Patch;

/// An immutable, versioned snapshot of the store's state.
#[derive(Debug)]
pub struct CanonicalState<V> {
    /// Symbol to value, in first-insertion order.
    entries: Arc<IndexMap<String, V>>,

    /// Incremented once per applied patch.
    version: u64,
}

impl<V: Clone> CanonicalState<V> {
    /// Create the initial state at version 0.
    pub fn new(entries: IndexMap<String, V>) -> Self {
        Self {
            entries: Arc::new(entries),
            version: 0,
        }
    }

    /// Produce the successor state with `patch` merged in.
    ///
    /// Keys not yet present are appended. The version always increases by
    /// one, even for an empty patch.
    pub fn apply(&self, patch: Patch<V>) -> Self {
        let mut entries = Arc::clone(&self.entries);
        let changes = patch.into_changes();
        if !changes.is_empty() {
            let map = Arc::make_mut(&mut entries);
            for (key, value) in changes {
                map.insert(key, value);
            }
        }

        Self {
            entries,
            version: self.version + 1,
        }
    }
}

impl<V> CanonicalState<V> {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Borrow the underlying map.
    pub fn entries(&self) -> &IndexMap<String, V> {
        &self.entries
    }

    /// Whether two snapshots share the same entry storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl<V> Clone for CanonicalState<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            version: self.version,
        }
    }
}

impl<V: Clone> Default for CanonicalState<V> {
    fn default() -> Self {
        Self::new(IndexMap::new())
    }
}

impl<K, V> FromIterator<(K, V)> for CanonicalState<V>
where
    K: Into<String>,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
