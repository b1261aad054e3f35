//! Application configuration.
//!
//! Values come from built-in defaults, an optional TOML file and
//! `TASKLIST_*` environment variables, in increasing priority.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tasklist_infrastructure::{DEFAULT_SECURE_TOKEN_URL, DEFAULT_TIMEOUT_MS};

/// Backend used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://todo-backend-self.vercel.app";

/// Settings for the terminal client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the task backend.
    pub base_url: String,
    /// Transport timeout for task requests, in milliseconds.
    pub timeout_ms: u64,
    /// Firebase Web API key used for token refresh.
    pub firebase_api_key: Option<String>,
    /// Firebase refresh token from a previous sign-in.
    pub firebase_refresh_token: Option<String>,
    /// Secure-token service base URL.
    pub secure_token_url: String,
    /// Pre-issued ID token; takes priority over the Firebase session.
    pub id_token: Option<String>,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            firebase_api_key: None,
            firebase_refresh_token: None,
            secure_token_url: DEFAULT_SECURE_TOKEN_URL.to_string(),
            id_token: None,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration.
    ///
    /// With `path`, that file must exist. Without it, `tasklist.toml` in the
    /// working directory is read if present.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = path.map_or_else(
            || File::with_name("tasklist").required(false),
            |p| File::from(p).required(true),
        );
        Self::from_builder(Config::builder().add_source(file))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .add_source(Environment::with_prefix("TASKLIST"))
            .build()?
            .try_deserialize()
    }
}
