//! Error types for graphbind-store.

use thiserror::Error;

/// Errors raised by backing store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The subscriber id was empty after trimming.
    #[error("subscriber id cannot be empty")]
    EmptySubscriberId,

    /// A subscriber with the same id is already registered.
    #[error("subscriber `{id}` is already registered")]
    DuplicateSubscriber { id: String },

    /// No subscriber is registered under the id.
    #[error("no subscriber registered under `{id}`")]
    UnknownSubscriber { id: String },
}

/// Result type alias using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::StoreError;

    #[test]
    fn duplicate_subscriber_display_includes_id() {
        let err = StoreError::DuplicateSubscriber {
            id: "audit".to_string(),
        };
        assert_eq!(err.to_string(), "subscriber `audit` is already registered");
    }

    #[test]
    fn empty_subscriber_id_display() {
        assert_eq!(
            StoreError::EmptySubscriberId.to_string(),
            "subscriber id cannot be empty"
        );
    }
}
