//! Error types for the checkin-history library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.

use thiserror::Error;

/// Errors that can occur in the checkin-history application.
#[derive(Error, Debug)]
pub enum CheckinError {
    /// A required field on a visit was missing or malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// The datastore could not be reached or a pooled connection could not be checked out
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with CheckinError
pub type Result<T> = std::result::Result<T, CheckinError>;

impl From<r2d2::Error> for CheckinError {
    fn from(err: r2d2::Error) -> Self {
        CheckinError::StorageUnavailable(err.to_string())
    }
}

impl From<anyhow::Error> for CheckinError {
    fn from(err: anyhow::Error) -> Self {
        CheckinError::Other(err.to_string())
    }
}
