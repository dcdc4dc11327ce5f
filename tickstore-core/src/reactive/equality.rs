//! Equality Engine
//!
//! Decides whether a selector's new result differs from the one the
//! subscriber last saw. A subscription is only notified when its comparator
//! says "not equal".
//!
//! # Strategies
//!
//! Different selectors return different shapes. A single price is fine with
//! plain `PartialEq`. A list or map of shared values may want identity
//! comparison per entry instead, which is what [`shallow_eq`] provides. Any
//! subscription can bring its own [`Comparator`].
//!
//! # Totality
//!
//! Comparison never fails from the dispatcher's point of view. If a custom
//! comparator panics, the pair is treated as unequal so the subscriber is
//! notified rather than silently left behind, and the panic is reported.

use std::hash::Hash;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::panic_message;

/// A per-subscription equality function.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Fallback comparison used by subscriptions registered without a comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EqualityStrategy {
    /// Compare with `PartialEq`.
    #[default]
    Structural,

    /// Never equal: notify on every flush the subscription is visited.
    AlwaysNotify,
}

impl EqualityStrategy {
    /// Build a comparator implementing this strategy.
    pub fn comparator<T: PartialEq + 'static>(self) -> Comparator<T> {
        match self {
            Self::Structural => Arc::new(structural_eq::<T>),
            Self::AlwaysNotify => Arc::new(|_: &T, _: &T| false),
        }
    }
}

/// Deep equality via `PartialEq`.
pub fn structural_eq<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

/// Key-wise identity over a map of shared values.
///
/// Equal when both maps have the same key set and every value is the same
/// allocation. Values are never compared by content.
pub fn shallow_eq<K, V>(a: &IndexMap<K, Arc<V>>, b: &IndexMap<K, Arc<V>>) -> bool
where
    K: Hash + Eq,
{
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| Arc::ptr_eq(value, other)))
}

/// Run a comparator, catching panics.
///
/// Returns `Err` with the panic message if the comparator panicked.
pub(crate) fn compare<T>(comparator: &Comparator<T>, a: &T, b: &T) -> Result<bool, String> {
    catch_unwind(AssertUnwindSafe(|| comparator(a, b))).map_err(panic_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_strategy_uses_partial_eq() {
        let cmp = EqualityStrategy::Structural.comparator::<f64>();
        assert!(cmp(&450.0, &450.0));
        assert!(!cmp(&450.0, &452.3));
    }

    #[test]
    fn always_notify_strategy_never_equal() {
        let cmp = EqualityStrategy::AlwaysNotify.comparator::<&str>();
        assert!(!cmp(&"links", &"links"));
    }

    #[test]
    fn shallow_eq_compares_identity_not_content() {
        let swiggy = Arc::new(vec![450.0]);
        let zomato = Arc::new(vec![180.0]);

        let a: IndexMap<_, _> = [("SWIGGY", swiggy.clone()), ("ZOMATO", zomato.clone())].into();
        // Same allocations, different insertion order.
        let b: IndexMap<_, _> = [("ZOMATO", zomato.clone()), ("SWIGGY", swiggy.clone())].into();
        assert!(shallow_eq(&a, &b));

        // Equal content, different allocation.
        let c: IndexMap<_, _> = [("SWIGGY", Arc::new(vec![450.0])), ("ZOMATO", zomato)].into();
        assert!(!shallow_eq(&a, &c));

        let d: IndexMap<_, _> = [("SWIGGY", swiggy)].into();
        assert!(!shallow_eq(&a, &d));
    }

    #[test]
    fn compare_catches_panics() {
        let cmp: Comparator<i32> = Arc::new(|_: &i32, _: &i32| -> bool { panic!("comparator exploded") });
        assert_eq!(compare(&cmp, &1, &1), Err("comparator exploded".to_string()));

        let ok: Comparator<i32> = Arc::new(|a: &i32, b: &i32| a == b);
        assert_eq!(compare(&ok, &1, &1), Ok(true));
    }

    #[test]
    fn strategy_deserializes_from_snake_case() {
        let s: EqualityStrategy = serde_json::from_str("\"always_notify\"").unwrap();
        assert_eq!(s, EqualityStrategy::AlwaysNotify);
        assert_eq!(EqualityStrategy::default(), EqualityStrategy::Structural);
    }
}
