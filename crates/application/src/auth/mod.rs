//! Authentication module for the Tasklist client.
//!
//! This module provides:
//! - In-memory identity token caching with expiry tracking
//! - The token provider every authenticated request goes through

mod token_cache;
mod token_provider;

pub use token_cache::TokenCache;
pub use token_provider::AuthTokenProvider;
