//! Application error types

use tasklist_domain::{DomainError, SyncErrorKind};
use thiserror::Error;

use crate::ports::ApiError;

/// Errors surfaced by task operations.
///
/// Every variant is recoverable: the controller turns it into a log entry
/// plus either a no-op or a rollback of optimistic state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Nobody is signed in or the identity token could not be obtained.
    #[error("authentication unavailable")]
    AuthUnavailable,

    /// Transport-level failure: no connectivity, DNS, or timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server error: HTTP {status}")]
    Server {
        /// HTTP status code.
        status: u16,
    },

    /// A success response carried a body that could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Input rejected before any request was made.
    #[error("validation error: {0}")]
    Validation(#[from] DomainError),
}

impl TaskError {
    /// Category used by the list status indicator.
    #[must_use]
    pub const fn kind(&self) -> SyncErrorKind {
        match self {
            Self::AuthUnavailable => SyncErrorKind::AuthUnavailable,
            Self::Network(_) => SyncErrorKind::Network,
            Self::Server { .. } => SyncErrorKind::Server,
            Self::InvalidResponse(_) => SyncErrorKind::InvalidResponse,
            Self::Validation(_) => SyncErrorKind::Validation,
        }
    }

    /// HTTP status code for server errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<ApiError> for TaskError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Timeout { timeout_ms } => {
                Self::Network(format!("request timed out after {timeout_ms}ms"))
            }
            ApiError::Connection(message) => Self::Network(message),
            ApiError::Status { status } => Self::Server { status },
            ApiError::Decode(message) => Self::InvalidResponse(message),
        }
    }
}

/// Result type alias for task operations.
pub type TaskResult<T> = Result<T, TaskError>;
