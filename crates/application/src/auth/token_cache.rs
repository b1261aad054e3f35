//! In-memory identity token cache with expiry tracking.

use std::sync::Arc;

use parking_lot::RwLock;
use tasklist_domain::IdToken;

use crate::ports::Clock;

/// Thread-safe cache for the signed-in user's identity token.
///
/// Identity adapters use it to answer non-forced token requests without a
/// round trip while the cached token is still comfortably valid.
#[derive(Clone)]
pub struct TokenCache {
    token: Arc<RwLock<Option<IdToken>>>,
    clock: Arc<dyn Clock>,
    /// Seconds before expiry at which a token is treated as stale.
    refresh_buffer_seconds: i64,
}

impl TokenCache {
    /// Create a cache that treats tokens as stale 60 seconds before expiry.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_refresh_buffer(clock, 60)
    }

    /// Create with custom refresh buffer.
    #[must_use]
    pub fn with_refresh_buffer(clock: Arc<dyn Clock>, refresh_buffer_seconds: i64) -> Self {
        Self {
            token: Arc::new(RwLock::new(None)),
            clock,
            refresh_buffer_seconds,
        }
    }

    /// Store a freshly issued token, replacing any previous one.
    pub fn store(&self, token: IdToken) {
        *self.token.write() = Some(token);
    }

    /// Get the cached token regardless of expiry.
    #[must_use]
    pub fn get(&self) -> Option<IdToken> {
        self.token.read().clone()
    }

    /// Get the cached token if it is not expired or about to expire.
    #[must_use]
    pub fn get_valid(&self) -> Option<IdToken> {
        let now = self.clock.now();
        self.token
            .read()
            .as_ref()
            .filter(|t| !t.is_expired_or_expiring(now, self.refresh_buffer_seconds))
            .cloned()
    }

    /// Drop the cached token.
    pub fn clear(&self) {
        *self.token.write() = None;
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("token", &*self.token.read())
            .field("refresh_buffer_seconds", &self.refresh_buffer_seconds)
            .finish_non_exhaustive()
    }
}
