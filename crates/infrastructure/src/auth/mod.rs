//! Identity provider adapters.

mod firebase;
mod static_token;

pub use firebase::{DEFAULT_SECURE_TOKEN_URL, FirebaseIdentityProvider};
pub use static_token::StaticIdentityProvider;
