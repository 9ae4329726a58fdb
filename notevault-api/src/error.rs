//! Error Types for the NoteVault API
//!
//! This module defines error handling for the API layer:
//! - ApiError struct for structured error responses
//! - ErrorCode enum for categorizing errors
//! - Conversions from storage, database and pool errors
//! - Conversion into tonic::Status for the gRPC surface
//!
//! Backend failures are logged, then surfaced as INTERNAL with the cause
//! wrapped in the status message.

use notevault_core::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tonic::{Code, Status};

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each code maps to exactly one gRPC status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request contains invalid input data
    InvalidInput,

    /// Requested note does not exist
    NoteNotFound,

    /// Database operation failed
    DatabaseError,

    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the gRPC status code for this error code.
    pub fn grpc_code(&self) -> Code {
        match self {
            ErrorCode::InvalidInput => Code::InvalidArgument,
            ErrorCode::NoteNotFound => Code::NotFound,
            ErrorCode::DatabaseError | ErrorCode::InternalError => Code::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Structured error for API operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (offending field, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add additional details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Get the gRPC status code for this error.
    pub fn grpc_code(&self) -> Code {
        self.code.grpc_code()
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a NoteNotFound error.
    pub fn note_not_found(note_id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::NoteNotFound, format!("Note {} not found", note_id))
    }

    /// Create a DatabaseError.
    pub fn database_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// TONIC INTEGRATION
// ============================================================================

/// Convert ApiError to tonic Status
impl From<ApiError> for Status {
    fn from(err: ApiError) -> Self {
        Status::new(err.grpc_code(), err.message)
    }
}

// ============================================================================
// CONVERSIONS FROM STANDARD ERRORS
// ============================================================================

/// Classify a storage failure.
///
/// NotFound and InvalidArgument pass through verbatim. Everything else is
/// logged and surfaced as a database error wrapping the cause.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { id } => ApiError::note_not_found(id),
            StorageError::InvalidArgument { field, reason } => {
                ApiError::invalid_input(format!("Invalid {}: {}", field, reason))
                    .with_details(serde_json::json!({ "field": field }))
            }
            StorageError::Backend { .. } | StorageError::PoolUnavailable { .. } => {
                tracing::error!(error = %err, "Storage error");
                ApiError::database_error(err.to_string())
            }
        }
    }
}

/// Convert from tokio_postgres::Error to ApiError.
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        ApiError::database_error(format!("Database operation failed: {}", err))
    }
}

/// Convert from deadpool_postgres::PoolError to ApiError.
impl From<deadpool_postgres::PoolError> for ApiError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        tracing::error!("Connection pool error: {:?}", err);

        match err {
            deadpool_postgres::PoolError::Timeout(_) => {
                ApiError::database_error("Timed out acquiring database connection")
            }
            deadpool_postgres::PoolError::Closed => {
                ApiError::database_error("Database connection pool is closed")
            }
            other => ApiError::database_error(format!(
                "Failed to acquire database connection: {}",
                other
            )),
        }
    }
}

/// Convert from tonic transport errors raised while binding or serving.
impl From<tonic::transport::Error> for ApiError {
    fn from(err: tonic::transport::Error) -> Self {
        ApiError::internal_error(format!("Transport error: {}", err))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
