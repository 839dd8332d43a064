/**
 * Backend Error Types
 *
 * Every board operation fails with one of four kinds:
 *
 * - `NotFound` - a board, list, card, membership or user is missing, or is
 *   not visible to the caller
 * - `PermissionDenied` - the caller can see the board but may not do this
 * - `InvalidInput` - malformed values such as negative positions or unknown
 *   invitation statuses
 * - `StorageFailure` - the store failed; the unit of work was rolled back
 *
 * A caller without access to a board gets the same `NotFound` as for a board
 * that does not exist.
 */

use std::fmt;

use thiserror::Error;

use crate::backend::ledger::LedgerError;
use crate::backend::storage::StorageError;
use crate::shared::SharedError;

/// Kind of entity a `NotFound` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Board,
    List,
    Card,
    Membership,
    User,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Board => "board",
            Resource::List => "list",
            Resource::Card => "card",
            Resource::Membership => "membership",
            Resource::User => "user",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use kanflow::backend::error::{BackendError, Resource};
///
/// let err = BackendError::not_found(Resource::Card);
/// assert_eq!(err.status_code(), 404);
///
/// let err = BackendError::invalid_input("position", "position cannot be negative");
/// assert_eq!(err.status_code(), 400);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Entity missing or hidden from the caller
    #[error("{resource} not found")]
    NotFound { resource: Resource },

    /// Caller is not allowed to perform the operation
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    /// Request carried an unusable value
    #[error("Invalid input in field '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Underlying store failed
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] StorageError),
}

impl BackendError {
    pub fn not_found(resource: Resource) -> Self {
        Self::NotFound { resource }
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status code for this error
    ///
    /// - `NotFound` - 404
    /// - `PermissionDenied` - 403
    /// - `InvalidInput` - 400
    /// - `StorageFailure` - 500
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::PermissionDenied { .. } => 403,
            Self::InvalidInput { .. } => 400,
            Self::StorageFailure(_) => 500,
        }
    }

    /// Client-facing message. Storage details stay in the logs.
    pub fn message(&self) -> String {
        match self {
            Self::StorageFailure(_) => "Internal storage error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<SharedError> for BackendError {
    fn from(err: SharedError) -> Self {
        let SharedError::ValidationError { field, message } = err;
        Self::InvalidInput { field, message }
    }
}

impl From<LedgerError> for BackendError {
    fn from(err: LedgerError) -> Self {
        Self::invalid_input("position", err.to_string())
    }
}
