//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer
//! or by the surface driving the controller.

mod clock;
mod confirm;
mod identity;
mod task_api;
mod view;

pub use clock::Clock;
pub use confirm::Confirmer;
pub use identity::{IdentityError, IdentityProvider};
pub use task_api::{ApiError, TaskApi};
pub use view::{Notice, TaskView};
