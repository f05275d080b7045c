//! Error types and result types for toy store operations.
//!
//! Use [`ToyStoreResult<T>`] as the return type for fallible operations. Transport
//! failures surface as [`ToyStoreError::Backend`] and are never retried here.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when querying or mutating toys.
#[derive(Error, Debug)]
pub enum ToyStoreError {
    /// The supplied identifier cannot be parsed into the store's identifier format.
    /// The operation is not attempted.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    /// The store acknowledged an insert without assigning a new identifier.
    #[error("can not post toy details, try again later")]
    InsertRejected,
    /// The payload is not a JSON object.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// A path parameter required by the operation was not supplied.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),
    /// Serialization/deserialization error when converting between BSON and JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during backend construction or configuration loading.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl ToyStoreError {
    /// Returns `true` for errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ToyStoreError::InvalidIdentifier(_)
                | ToyStoreError::InsertRejected
                | ToyStoreError::InvalidDocument(_)
                | ToyStoreError::MissingParameter(_)
        )
    }
}

/// A specialized `Result` type for toy store operations.
pub type ToyStoreResult<T> = Result<T, ToyStoreError>;

impl From<BsonError> for ToyStoreError {
    fn from(err: BsonError) -> Self {
        ToyStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for ToyStoreError {
    fn from(err: SerdeJsonError) -> Self {
        ToyStoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejected_carries_client_message() {
        assert_eq!(
            ToyStoreError::InsertRejected.to_string(),
            "can not post toy details, try again later",
        );
    }

    #[test]
    fn backend_errors_are_not_client_errors() {
        assert!(ToyStoreError::InvalidIdentifier("zz".into()).is_client_error());
        assert!(ToyStoreError::InsertRejected.is_client_error());
        assert!(!ToyStoreError::Backend("connection reset".into()).is_client_error());
    }
}
