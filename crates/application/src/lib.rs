//! Tasklist Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for the task API, identity, clock and view)
//! - Token handling and the authenticated task repository
//! - The task list controller with optimistic updates
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;
pub mod tasks;

#[cfg(test)]
mod testing;

pub use auth::{AuthTokenProvider, TokenCache};
pub use error::{TaskError, TaskResult};
pub use ports::{
    ApiError, Clock, Confirmer, IdentityError, IdentityProvider, Notice, TaskApi, TaskView,
};
pub use tasks::{
    CreateOutcome, DELETE_COMPLETED_PROMPT, DeleteOutcome, FetchOutcome, SIGN_OUT_PROMPT,
    SignOutOutcome, TaskListController, TaskRepository, ToggleOutcome,
};
