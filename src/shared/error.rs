//! Shared Error Types
//!
//! Errors raised while validating the transport-neutral types in
//! [`crate::shared`]. The backend folds them into its own taxonomy as
//! invalid-input failures.
//!
//! # Usage
//!
//! ```rust
//! use kanflow::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "title cannot be empty");
//! ```
use thiserror::Error;

/// Errors that can occur while handling shared types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
