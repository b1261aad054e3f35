//! Adapter construction errors

use thiserror::Error;

/// Errors raised while building an adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A configured URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}
