//! Error types for the store.
//!
//! There are two families of failure:
//!
//! - [`StoreError`] is returned from store operations and is fatal to the
//!   caller's operation only. The store itself is left untouched.
//! - [`SubscriptionError`] describes a failure inside one subscription's
//!   selector, comparator or callback. These never escape a flush; they are
//!   collected into the [`FlushReport`](crate::FlushReport) and handed to the
//!   store's error handler after the pass completes.

use std::any::Any;

use thiserror::Error;

use crate::reactive::SubscriptionId;

/// Error returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store has been disposed")]
    Disposed,

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("scheduler runtime unavailable: {0}")]
    Runtime(String),
}

/// A failure isolated to a single subscription during evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("selector for subscription {id} panicked: {message}")]
    Selector { id: SubscriptionId, message: String },

    #[error("comparator for subscription {id} panicked: {message}")]
    Comparator { id: SubscriptionId, message: String },

    #[error("callback for subscription {id} panicked: {message}")]
    Callback { id: SubscriptionId, message: String },
}

impl SubscriptionError {
    /// The subscription the failure belongs to.
    pub fn id(&self) -> SubscriptionId {
        match self {
            Self::Selector { id, .. } | Self::Comparator { id, .. } | Self::Callback { id, .. } => {
                *id
            }
        }
    }
}

/// Extract a readable message from a caught panic payload.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_message_handles_str_and_string() {
        assert_eq!(panic_message(Box::new("boom")), "boom");
        assert_eq!(panic_message(Box::new(String::from("bang"))), "bang");
        assert_eq!(panic_message(Box::new(42_u8)), "non-string panic payload");
    }

    #[test]
    fn subscription_error_reports_its_id() {
        let id = SubscriptionId::new();
        let err = SubscriptionError::Comparator {
            id,
            message: "nope".into(),
        };
        assert_eq!(err.id(), id);
        assert!(err.to_string().contains("comparator"));
    }
}
