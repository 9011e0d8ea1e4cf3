//! Error types for grant store operations

use acl_model::ModelError;
use thiserror::Error;

/// Grant store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write would break a store invariant (duplicate grant, unknown
    /// reference, reserved id, ...)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// The backing store cannot serve reads
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Dataset contents are unusable
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Failed to read a dataset file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a dataset document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for grant store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        StoreError::InvariantViolation(err.to_string())
    }
}

impl StoreError {
    /// Whether the error comes from rejected input rather than the store
    /// itself.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, StoreError::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acl_model::ResourceId;

    #[test]
    fn test_model_error_maps_to_invariant_violation() {
        let err: StoreError = ModelError::EveryoneAsGroup(ResourceId(2)).into();
        assert!(err.is_invariant_violation());
        assert_eq!(
            err.to_string(),
            "Invariant violation: Subject id 0 cannot be a group (resource 2)"
        );
    }

    #[test]
    fn test_unavailable_is_not_invariant_violation() {
        let err = StoreError::Unavailable("connection reset".to_string());
        assert!(!err.is_invariant_violation());
    }
}
