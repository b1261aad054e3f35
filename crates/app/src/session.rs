//! Identity selection for the terminal client.

use async_trait::async_trait;
use tasklist_application::ports::{IdentityError, IdentityProvider};
use tasklist_domain::IdToken;
use tasklist_infrastructure::{
    AdapterError, FirebaseIdentityProvider, StaticIdentityProvider, SystemClock,
};

use crate::settings::AppConfig;

/// The identity source picked from configuration.
#[derive(Debug)]
pub enum Session {
    /// A pre-issued ID token.
    Static(StaticIdentityProvider),
    /// A Firebase session refreshed on demand.
    Firebase(FirebaseIdentityProvider),
}

impl Session {
    /// Picks the identity source.
    ///
    /// A configured `id_token` wins; otherwise a Firebase session is used
    /// when an API key is set. With neither, nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns an error if the Firebase adapter cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AdapterError> {
        if let Some(token) = config.id_token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Ok(Self::Static(StaticIdentityProvider::new(token)));
        }

        match config.firebase_api_key.as_deref() {
            Some(api_key) => FirebaseIdentityProvider::with_endpoint(
                &config.secure_token_url,
                api_key,
                config.firebase_refresh_token.clone(),
                config.timeout_ms,
                SystemClock::shared(),
            )
            .map(Self::Firebase),
            None => {
                tracing::debug!("no credentials configured");
                Ok(Self::Static(StaticIdentityProvider::signed_out()))
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for Session {
    fn current_user(&self) -> Option<String> {
        match self {
            Self::Static(provider) => provider.current_user(),
            Self::Firebase(provider) => provider.current_user(),
        }
    }

    async fn get_id_token(&self, force_refresh: bool) -> Result<IdToken, IdentityError> {
        match self {
            Self::Static(provider) => provider.get_id_token(force_refresh).await,
            Self::Firebase(provider) => provider.get_id_token(force_refresh).await,
        }
    }

    fn sign_out(&self) {
        match self {
            Self::Static(provider) => provider.sign_out(),
            Self::Firebase(provider) => provider.sign_out(),
        }
    }
}
