//! Task list synchronization: the authenticated repository and the
//! controller that keeps the local list in step with the server.

mod controller;
mod repository;

pub use controller::{
    CreateOutcome, DELETE_COMPLETED_PROMPT, DeleteOutcome, FetchOutcome, SIGN_OUT_PROMPT,
    SignOutOutcome, TaskListController, ToggleOutcome,
};
pub use repository::TaskRepository;
