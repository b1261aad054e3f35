//! Identity provider port

use async_trait::async_trait;
use tasklist_domain::IdToken;

/// Errors reported by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// No user session exists.
    #[error("no user is signed in")]
    NotSignedIn,

    /// The provider rejected the token request.
    #[error("token request rejected: {0}")]
    Rejected(String),

    /// The provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    Network(String),
}

/// Source of identity tokens for the signed-in user.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Identifier of the signed-in user, or `None` when signed out.
    fn current_user(&self) -> Option<String>;

    /// Returns an identity token for the current user.
    ///
    /// With `force_refresh = false` a cached token is returned unless it has
    /// expired; with `true` a new token is always requested.
    ///
    /// # Errors
    /// Returns an error if nobody is signed in or the token cannot be issued.
    async fn get_id_token(&self, force_refresh: bool) -> Result<IdToken, IdentityError>;

    /// Ends the current session. Later token requests fail with
    /// [`IdentityError::NotSignedIn`].
    fn sign_out(&self);
}
