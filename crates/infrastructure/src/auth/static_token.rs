//! Identity provider backed by a pre-issued token.

use async_trait::async_trait;
use parking_lot::RwLock;
use tasklist_application::ports::{IdentityError, IdentityProvider};
use tasklist_domain::IdToken;

/// User id reported while a static token is configured.
const STATIC_USER: &str = "static-token";

/// Serves one fixed identity token, e.g. one minted by another tool.
///
/// An empty token means nobody is signed in.
#[derive(Debug)]
pub struct StaticIdentityProvider {
    token: RwLock<Option<IdToken>>,
}

impl StaticIdentityProvider {
    /// Creates a provider for the given raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        Self {
            token: RwLock::new((!token.is_empty()).then(|| IdToken::new(token, None))),
        }
    }

    /// Creates a provider with no session.
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            token: RwLock::new(None),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    fn current_user(&self) -> Option<String> {
        self.token.read().as_ref().map(|_| STATIC_USER.to_string())
    }

    async fn get_id_token(&self, _force_refresh: bool) -> Result<IdToken, IdentityError> {
        self.token.read().clone().ok_or(IdentityError::NotSignedIn)
    }

    fn sign_out(&self) {
        *self.token.write() = None;
    }
}
