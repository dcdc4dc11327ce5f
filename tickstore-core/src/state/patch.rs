//! Patches
//!
//! A patch is a partial update: a handful of keys with their new values,
//! stamped with the time it was produced. Feed sources build patches and hand
//! them to [`Store::apply_update`](crate::Store::apply_update).

use std::time::SystemTime;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A partial update to the canonical state.
///
/// # Example
///
/// ```rust
/// use tickstore_core::Patch;
///
/// let patch = Patch::new().set("SWIGGY", 452.3).set("ZEPTO", 321.0);
/// assert_eq!(patch.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch<V> {
    /// Changed keys in the order they were set.
    changes: IndexMap<String, V>,

    /// When the patch was produced.
    timestamp: SystemTime,
}

impl<V> Patch<V> {
    /// Create an empty patch stamped with the current time.
    pub fn new() -> Self {
        Self {
            changes: IndexMap::new(),
            timestamp: SystemTime::now(),
        }
    }

    /// Set a key in the patch. A later `set` of the same key wins.
    pub fn set(mut self, key: impl Into<String>, value: V) -> Self {
        self.changes.insert(key.into(), value);
        self
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Iterate over the changed entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.changes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn into_changes(self) -> IndexMap<String, V> {
        self.changes
    }
}

impl<V> Default for Patch<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for Patch<V>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Patch::new(), |patch, (k, v)| patch.set(k, v))
    }
}
