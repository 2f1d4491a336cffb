//! Storage error types
//!
//! Error codes:
//! - PRODUCT_NOT_FOUND / LEAD_NOT_FOUND: lookup by id failed
//! - DUPLICATE_RECORD: insert with an id already present
//! - STORAGE_IO_ERROR: filesystem failure
//! - DATA_CORRUPTION: a record file could not be decoded (fatal at open)
//! - LOCK_POISONED: a writer panicked while holding a store lock

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("product not found")]
    ProductNotFound(String),

    #[error("lead not found")]
    LeadNotFound(String),

    #[error("record '{0}' already exists")]
    Duplicate(String),

    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt record file {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("storage lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    pub(crate) fn io(context: &'static str, path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn corrupt(path: &Path, reason: impl ToString) -> Self {
        StorageError::Corrupt {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            StorageError::LeadNotFound(_) => "LEAD_NOT_FOUND",
            StorageError::Duplicate(_) => "DUPLICATE_RECORD",
            StorageError::Io { .. } => "STORAGE_IO_ERROR",
            StorageError::Corrupt { .. } => "DATA_CORRUPTION",
            StorageError::LockPoisoned => "LOCK_POISONED",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::ProductNotFound(_) | StorageError::LeadNotFound(_)
        )
    }

    /// Corrupt data on disk must stop the process from serving.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StorageError::Corrupt { .. })
    }
}
