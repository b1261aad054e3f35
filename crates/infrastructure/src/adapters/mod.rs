//! Infrastructure adapters

mod reqwest_task_api;
mod system_clock;

pub use reqwest_task_api::{DEFAULT_TIMEOUT_MS, ReqwestTaskApi};
pub use system_clock::SystemClock;
