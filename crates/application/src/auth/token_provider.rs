//! Bearer token provider for authenticated task requests.

use tasklist_domain::IdToken;

use crate::ports::IdentityProvider;

/// Hands out the current user's identity token on demand.
///
/// This never fails loudly: when nobody is signed in or the identity provider
/// errors, the problem is logged and `None` is returned so the calling
/// operation can abort.
pub struct AuthTokenProvider<P> {
    identity: P,
}

impl<P: IdentityProvider> AuthTokenProvider<P> {
    /// Creates a provider backed by the given identity source.
    #[must_use]
    pub const fn new(identity: P) -> Self {
        Self { identity }
    }

    /// Returns a usable token, refreshing only if the cached one expired.
    pub async fn get_token(&self) -> Option<IdToken> {
        let Some(user) = self.identity.current_user() else {
            tracing::warn!("no signed-in user; skipping authenticated request");
            return None;
        };

        match self.identity.get_id_token(false).await {
            Ok(token) => {
                tracing::debug!(%user, token = %token.preview(), "obtained identity token");
                Some(token)
            }
            Err(error) => {
                tracing::warn!(%user, %error, "failed to obtain identity token");
                None
            }
        }
    }

    /// Access the underlying identity provider.
    #[must_use]
    pub const fn identity(&self) -> &P {
        &self.identity
    }
}
