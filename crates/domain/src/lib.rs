//! Tasklist Domain - Core business types
//!
//! This crate defines the domain model for the Tasklist sync client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod collection;
pub mod error;
pub mod state;
pub mod task;

pub use auth::IdToken;
pub use collection::TaskCollection;
pub use error::{DomainError, DomainResult};
pub use state::{SyncErrorKind, SyncStatus};
pub use task::{Task, TaskTitle};
