//! Error types for access queries
//!
//! Queries fail in two ways: the caller referenced an id that does not
//! exist, or the store could not answer. Store failures are not retried
//! here; retries belong to the caller.

use acl_model::{ResourceId, UserId};
use acl_store::StoreError;
use std::fmt;
use thiserror::Error;

/// The entity a query referenced but the store does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundKind {
    /// Unknown resource id
    Resource(ResourceId),
    /// Unknown user id
    User(UserId),
}

impl fmt::Display for NotFoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundKind::Resource(id) => write!(f, "resource_not_found: {}", id),
            NotFoundKind::User(id) => write!(f, "user_not_found: {}", id),
        }
    }
}

/// Access query error types.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Referenced resource or user does not exist
    #[error("Not found: {0}")]
    NotFound(NotFoundKind),

    /// Store failure or any other unexpected condition
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for access queries.
pub type QueryResult<T> = Result<T, QueryError>;

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        QueryError::Internal(err.to_string())
    }
}

impl QueryError {
    /// Error for an unknown resource.
    pub fn resource_not_found(id: ResourceId) -> Self {
        QueryError::NotFound(NotFoundKind::Resource(id))
    }

    /// Error for an unknown user.
    pub fn user_not_found(id: UserId) -> Self {
        QueryError::NotFound(NotFoundKind::User(id))
    }

    /// Check if this error should be logged at error level.
    ///
    /// Not-found is an expected client condition.
    pub fn is_server_error(&self) -> bool {
        matches!(self, QueryError::Internal(_))
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::NotFound(_) => 404,
            QueryError::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            QueryError::NotFound(NotFoundKind::Resource(_)) => "RESOURCE_NOT_FOUND",
            QueryError::NotFound(NotFoundKind::User(_)) => "USER_NOT_FOUND",
            QueryError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
