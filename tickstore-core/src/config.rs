//! Store configuration.
//!
//! Recognized options:
//!
//! | Field                | Meaning                                        | Default        |
//! |----------------------|------------------------------------------------|----------------|
//! | `window_ms`          | Coalescing window duration                     | `16`           |
//! | `initial_state`      | Seed entries for the canonical state           | empty          |
//! | `default_comparator` | Equality strategy for subscriptions without one| `"structural"` |
//!
//! ```rust
//! use tickstore_core::StoreConfig;
//!
//! let config: StoreConfig<f64> = StoreConfig::from_json(
//!     r#"{ "window_ms": 100, "initial_state": { "SWIGGY": 450.0 } }"#,
//! ).unwrap();
//! assert_eq!(config.window_ms, 100);
//! ```

use std::time::Duration;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::reactive::EqualityStrategy;

/// Default coalescing window: roughly one display frame.
pub const DEFAULT_WINDOW_MS: u64 = 16;

fn default_window_ms() -> u64 {
    DEFAULT_WINDOW_MS
}

/// Configuration for a [`Store`](crate::Store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de>"))]
pub struct StoreConfig<V> {
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    #[serde(default = "IndexMap::new")]
    pub initial_state: IndexMap<String, V>,

    #[serde(default)]
    pub default_comparator: EqualityStrategy,
}

impl<V> StoreConfig<V> {
    pub fn new() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            initial_state: IndexMap::new(),
            default_comparator: EqualityStrategy::default(),
        }
    }

    /// Set the coalescing window.
    ///
    /// The window is kept in whole milliseconds. Any non-zero window shorter
    /// than that is rounded up to 1 ms rather than collapsing to zero.
    pub fn with_window(mut self, window: Duration) -> Self {
        let millis = u64::try_from(window.as_millis()).unwrap_or(u64::MAX);
        self.window_ms = if millis == 0 && !window.is_zero() { 1 } else { millis };
        self
    }

    /// Seed the canonical state.
    pub fn with_initial_state<K, I>(mut self, entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.initial_state = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// Set the fallback equality strategy.
    pub fn with_default_comparator(mut self, strategy: EqualityStrategy) -> Self {
        self.default_comparator = strategy;
        self
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

impl<V: DeserializeOwned> StoreConfig<V> {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<V> Default for StoreConfig<V> {
    fn default() -> Self {
        Self::new()
    }
}
