//! Tasklist Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod auth;
pub mod error;

pub use adapters::{DEFAULT_TIMEOUT_MS, ReqwestTaskApi, SystemClock};
pub use auth::{DEFAULT_SECURE_TOKEN_URL, FirebaseIdentityProvider, StaticIdentityProvider};
pub use error::AdapterError;
