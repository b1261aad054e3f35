//! Firebase identity provider.
//!
//! Exchanges a Firebase refresh token for short-lived ID tokens at the
//! secure-token endpoint and caches each ID token until shortly before it
//! expires.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use tasklist_application::TokenCache;
use tasklist_application::ports::{Clock, IdentityError, IdentityProvider};
use tasklist_domain::IdToken;
use url::Url;

use crate::adapters::DEFAULT_TIMEOUT_MS;
use crate::error::AdapterError;

/// Production secure-token service.
pub const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com";

/// Content-Type for form-urlencoded data.
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Lifetime assumed when the service omits or garbles `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Longest `expires_in` taken at face value. ID tokens live one hour.
const MAX_EXPIRES_IN_SECS: u64 = 86_400;

/// Reported as the user until the first refresh names the real one.
const UNVERIFIED_USER: &str = "unverified";

/// Error codes after which the refresh token can never work again.
const SESSION_ENDING_ERRORS: [&str; 4] = [
    "TOKEN_EXPIRED",
    "USER_DISABLED",
    "USER_NOT_FOUND",
    "INVALID_REFRESH_TOKEN",
];

/// Secure-token response. `expires_in` is a decimal string.
#[derive(Debug, Deserialize)]
struct SecureTokenResponse {
    id_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<String>,
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
struct Session {
    refresh_token: String,
    user_id: Option<String>,
}

/// Identity provider for a Firebase user session.
///
/// The session starts from a refresh token obtained at sign-in. Refresh
/// tokens rotated by the service replace the stored one.
pub struct FirebaseIdentityProvider {
    http_client: reqwest::Client,
    token_url: Url,
    session: RwLock<Option<Session>>,
    cache: TokenCache,
    clock: Arc<dyn Clock>,
}

impl FirebaseIdentityProvider {
    /// Create a provider talking to the production secure-token service.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: &str,
        refresh_token: Option<String>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AdapterError> {
        Self::with_endpoint(
            DEFAULT_SECURE_TOKEN_URL,
            api_key,
            refresh_token,
            DEFAULT_TIMEOUT_MS,
            clock,
        )
    }

    /// Create a provider against a custom secure-token endpoint.
    ///
    /// Any path on `endpoint` is kept, so emulator prefixes such as
    /// `http://localhost:9099/securetoken.googleapis.com` work.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL is invalid or the HTTP client
    /// cannot be built.
    pub fn with_endpoint(
        endpoint: &str,
        api_key: &str,
        refresh_token: Option<String>,
        timeout_ms: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AdapterError> {
        let mut base = endpoint.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let mut token_url = Url::parse(&base)
            .and_then(|base| base.join("v1/token"))
            .map_err(|e| AdapterError::InvalidUrl(format!("{e}: {endpoint}")))?;
        token_url.query_pairs_mut().append_pair("key", api_key);

        let http_client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| AdapterError::Client(e.to_string()))?;

        let session = refresh_token
            .filter(|t| !t.trim().is_empty())
            .map(|refresh_token| Session {
                refresh_token,
                user_id: None,
            });

        Ok(Self {
            http_client,
            token_url,
            session: RwLock::new(session),
            cache: TokenCache::new(Arc::clone(&clock)),
            clock,
        })
    }

    /// Execute refresh token flow.
    async fn refresh(&self, refresh_token: &str) -> Result<IdToken, IdentityError> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];
        let body = serde_urlencoded::to_string(params)
            .map_err(|e| IdentityError::Rejected(format!("Failed to encode form: {e}")))?;

        let response = self
            .http_client
            .post(self.token_url.clone())
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorEnvelope>(&error_text)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| format!("HTTP {status}"));
            if SESSION_ENDING_ERRORS.iter().any(|c| code.starts_with(c)) {
                tracing::warn!(%code, "refresh token no longer valid; signing out");
                self.sign_out();
            }
            return Err(IdentityError::Rejected(code));
        }

        let token_response: SecureTokenResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Rejected(format!("Failed to parse token response: {e}")))?;

        let expires_in = token_response
            .expires_in
            .as_deref()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs <= MAX_EXPIRES_IN_SECS)
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let token = IdToken::issued_at(token_response.id_token, self.clock.now(), expires_in);

        if let Some(session) = self.session.write().as_mut() {
            if let Some(rotated) = token_response.refresh_token {
                session.refresh_token = rotated;
            }
            if token_response.user_id.is_some() {
                session.user_id = token_response.user_id;
            }
        }
        self.cache.store(token.clone());
        tracing::debug!(token = %token.preview(), expires_in, "refreshed Firebase ID token");

        Ok(token)
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    fn current_user(&self) -> Option<String> {
        self.session
            .read()
            .as_ref()
            .map(|s| s.user_id.clone().unwrap_or_else(|| UNVERIFIED_USER.to_string()))
    }

    async fn get_id_token(&self, force_refresh: bool) -> Result<IdToken, IdentityError> {
        let refresh_token = self
            .session
            .read()
            .as_ref()
            .map(|s| s.refresh_token.clone())
            .ok_or(IdentityError::NotSignedIn)?;

        if !force_refresh {
            if let Some(token) = self.cache.get_valid() {
                return Ok(token);
            }
        }

        self.refresh(&refresh_token).await
    }

    /// Ends the session and forgets every cached token.
    fn sign_out(&self) {
        *self.session.write() = None;
        self.cache.clear();
    }
}

impl std::fmt::Debug for FirebaseIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseIdentityProvider")
            .field("token_url", &self.token_url.path())
            .field("signed_in", &self.session.read().is_some())
            .finish_non_exhaustive()
    }
}
