//! API error types
//!
//! Service errors wrap the schema, validation and storage failures below
//! them. Messages are what clients see; codes pass through from the
//! originating subsystem.

use thiserror::Error;

use crate::schema::{SchemaError, ValidationError};
use crate::storage::StorageError;

/// Result type for service operations
pub type ApiResult<T> = Result<T, ApiError>;

/// How a failure should be reported to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself is unacceptable
    Invalid,
    /// The addressed record does not exist
    NotFound,
    /// The service failed; details stay in the logs
    Internal,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Message already carries the `invalid schema:` prefix
    #[error("{0}")]
    InvalidSchema(#[from] SchemaError),

    #[error("data validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("product not found")]
    ProductNotFound(String),

    #[error("lead not found")]
    LeadNotFound(String),

    #[error("storage failure: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ProductNotFound(id) => ApiError::ProductNotFound(id),
            StorageError::LeadNotFound(id) => ApiError::LeadNotFound(id),
            other => ApiError::Storage(other),
        }
    }
}

impl ApiError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidSchema(e) => e.code(),
            ApiError::ValidationFailed(e) => e.code(),
            ApiError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            ApiError::LeadNotFound(_) => "LEAD_NOT_FOUND",
            ApiError::Storage(e) => e.code(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::InvalidSchema(_) | ApiError::ValidationFailed(_) => ErrorCategory::Invalid,
            ApiError::ProductNotFound(_) | ApiError::LeadNotFound(_) => ErrorCategory::NotFound,
            ApiError::Storage(_) => ErrorCategory::Internal,
        }
    }
}
