//! # Error Types
//!
//! Structured error types for etabs_core. Hard failures of the adapter
//! (file access, snapshot parsing, settings) surface as [`AdapterError`].
//! Soft failures while pushing objects are not errors: they are collected
//! as [`crate::diagnostics::Diagnostic`] entries instead.
//!
//! ## Example
//!
//! ```rust
//! use etabs_core::errors::{AdapterError, AdapterResult};
//!
//! fn validate_tolerance(tolerance: f64) -> AdapterResult<()> {
//!     if tolerance < 0.0 {
//!         return Err(AdapterError::InvalidInput {
//!             field: "orientation_tolerance".to_string(),
//!             value: tolerance.to_string(),
//!             reason: "Tolerance must not be negative".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for etabs_core operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Structured error type for adapter operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum AdapterError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The external application rejected a call
    #[error("API call {call} failed with status {status}")]
    ApiCallFailed { call: String, status: i32 },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl AdapterError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        AdapterError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an ApiCallFailed error
    pub fn api_call_failed(call: impl Into<String>, status: i32) -> Self {
        AdapterError::ApiCallFailed {
            call: call.into(),
            status,
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        AdapterError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        AdapterError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        AdapterError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AdapterError::InvalidInput { .. } => "INVALID_INPUT",
            AdapterError::ApiCallFailed { .. } => "API_CALL_FAILED",
            AdapterError::FileError { .. } => "FILE_ERROR",
            AdapterError::FileLocked { .. } => "FILE_LOCKED",
            AdapterError::SerializationError { .. } => "SERIALIZATION_ERROR",
            AdapterError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(e: serde_json::Error) -> Self {
        AdapterError::serialization(e.to_string())
    }
}
