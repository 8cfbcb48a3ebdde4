//! Backend configuration.
//!
//! Configuration priority: environment variable > built-in local default.

use std::env;

/// Default address of a locally running chat service.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable overriding the service base URL.
const BASE_URL_ENV: &str = "MURMUR_API_URL";

/// Connection settings for the remote chat service.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the chat service, without a trailing slash.
    pub base_url: String,
}

impl BackendConfig {
    /// Creates a configuration with an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Loads configuration from the environment.
    ///
    /// Reads `MURMUR_API_URL`, falling back to `http://localhost:8000`
    /// when unset or empty.
    pub fn from_env() -> Self {
        let base_url = env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
