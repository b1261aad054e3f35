//! Task API port
//!
//! The transport for the remote task service. Each method is a single
//! request/response round trip carrying the caller's identity token.

use async_trait::async_trait;
use tasklist_domain::{IdToken, Task, TaskTitle};

/// Errors returned by a task API transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request did not complete within the transport timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The request could not be sent or the response could not be read.
    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// A success response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Remote task service.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetches every task owned by the token's user.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    async fn list(&self, token: &IdToken) -> Result<Vec<Task>, ApiError>;

    /// Creates a task with the given title; the server sets `completed = false`.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    async fn create(&self, token: &IdToken, title: &TaskTitle) -> Result<Task, ApiError>;

    /// Updates only the completion flag of one task.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    async fn update_completed(
        &self,
        token: &IdToken,
        id: &str,
        completed: bool,
    ) -> Result<Task, ApiError>;

    /// Deletes all completed tasks in one call.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status.
    async fn delete_completed(&self, token: &IdToken) -> Result<(), ApiError>;
}
