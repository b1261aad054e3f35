//! Identity token types.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// A short-lived identity token issued by the identity provider.
///
/// The token proves the caller's identity to the task backend and is sent as
/// a bearer credential on every request.
#[derive(Clone, PartialEq, Eq)]
pub struct IdToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl IdToken {
    /// Creates a token with a known expiry instant.
    #[must_use]
    pub fn new(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Creates a token that expires `expires_in_secs` after `issued_at`.
    ///
    /// Lifetimes past the representable range saturate at the latest instant.
    #[must_use]
    pub fn issued_at(
        value: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_in_secs: u64,
    ) -> Self {
        let expires_at = i64::try_from(expires_in_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(value, Some(expires_at))
    }

    /// The raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// When the token stops being accepted, if known.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Check if the token is expired at `now` or will expire within the buffer.
    #[must_use]
    pub fn is_expired_or_expiring(&self, now: DateTime<Utc>, buffer_seconds: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| {
            TimeDelta::try_seconds(buffer_seconds)
                .and_then(|buffer| now.checked_add_signed(buffer))
                .is_none_or(|deadline| deadline >= expires_at)
        })
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }

    /// First few characters of the token, for logs.
    #[must_use]
    pub fn preview(&self) -> String {
        if self.value.len() > 12 {
            format!("{}...", self.value.chars().take(8).collect::<String>())
        } else {
            "***".to_string()
        }
    }
}

impl fmt::Debug for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdToken")
            .field("value", &self.preview())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).single().unwrap_or_default()
    }

    #[test]
    fn test_bearer_header() {
        let token = IdToken::new("abc", None);
        assert_eq!(token.bearer(), "Bearer abc");
    }

    #[test]
    fn test_expiry_with_buffer() {
        let token = IdToken::issued_at("abc", at(0), 3600);
        assert!(!token.is_expired_or_expiring(at(0), 60));
        assert!(!token.is_expired_or_expiring(at(3539), 60));
        assert!(token.is_expired_or_expiring(at(3540), 60));
        assert!(token.is_expired_or_expiring(at(3600), 0));
    }

    #[test]
    fn test_huge_lifetime_saturates() {
        let token = IdToken::issued_at("abc", at(0), 99_999_999_999_999);
        assert_eq!(token.expires_at(), Some(DateTime::<Utc>::MAX_UTC));
        assert!(!token.is_expired_or_expiring(at(0), 60));

        let token = IdToken::issued_at("abc", at(0), u64::MAX);
        assert_eq!(token.expires_at(), Some(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_token_without_expiry_never_expires() {
        let token = IdToken::new("abc", None);
        assert!(!token.is_expired_or_expiring(at(1_000_000), 60));
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let token = IdToken::new("eyJhbGciOiJSUzI1NiIsImtpZCI6", None);
        let debug = format!("{token:?}");
        assert!(debug.contains("eyJhbGci..."));
        assert!(!debug.contains("eyJhbGciOiJSUzI1NiIsImtpZCI6"));
        assert_eq!(IdToken::new("short", None).preview(), "***");
    }
}
