//! Error types for NoteVault storage operations

use thiserror::Error;

use crate::NoteId;

/// Storage layer errors.
///
/// Every store implementation reports failures through this enum so the
/// API layer can classify them without knowing the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Note not found: {id}")]
    NotFound { id: NoteId },

    #[error("Invalid value for {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("{operation} failed: {reason}")]
    Backend { operation: String, reason: String },

    #[error("Connection pool unavailable: {reason}")]
    PoolUnavailable { reason: String },
}

impl StorageError {
    /// Shorthand for a failed statement.
    pub fn backend(operation: impl Into<String>, reason: impl ToString) -> Self {
        Self::Backend {
            operation: operation.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
