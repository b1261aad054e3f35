//! Synchronization state types for view binding.
//!
//! This module defines the list-level status the controller exposes so a
//! view can show a spinner or an error indicator next to the task list.

use serde::{Deserialize, Serialize};

/// Represents the synchronization status of the task list.
///
/// - `Idle`: nothing in flight, the list shows the last known data
/// - `Loading`: a request is in flight
/// - `Error`: the last action failed; the list still shows stale data
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncStatus {
    /// No request pending.
    #[default]
    Idle,

    /// A request is in progress.
    Loading,

    /// The last action failed.
    Error {
        /// Error category for display.
        kind: SyncErrorKind,
        /// Human-readable error message.
        message: String,
    },
}

impl SyncStatus {
    /// Creates an Error status.
    #[must_use]
    pub fn error(kind: SyncErrorKind, message: impl Into<String>) -> Self {
        Self::Error {
            kind,
            message: message.into(),
        }
    }

    /// Returns true if a request is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the last action failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns the error kind if in Error state.
    #[must_use]
    pub const fn error_kind(&self) -> Option<SyncErrorKind> {
        match self {
            Self::Error { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Categories of sync failures for user-friendly display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncErrorKind {
    /// Nobody is signed in, or the identity token could not be obtained.
    AuthUnavailable,

    /// The request never reached the server or timed out.
    Network,

    /// The server answered with a non-success status.
    Server,

    /// The server answered with a body that could not be understood.
    InvalidResponse,

    /// The input was rejected before any request was made.
    Validation,
}

impl SyncErrorKind {
    /// Returns a human-readable title for this error type.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::AuthUnavailable => "Not Signed In",
            Self::Network => "Network Unavailable",
            Self::Server => "Server Error",
            Self::InvalidResponse => "Unexpected Response",
            Self::Validation => "Invalid Input",
        }
    }
}
