//! Engine and credential configuration
//!
//! `EngineConfig` describes how to reach the generation backend;
//! `LlmSettings` is the opaque provider/model/credential passthrough that
//! every generation request carries.

mod settings;

pub use settings::LlmSettings;

use std::time::Duration;

/// Default backend endpoint when none is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Connection settings for the generation backend
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the generation backend
    pub base_url: String,
    /// Bearer token forwarded with every request, if present
    pub auth_token: Option<String>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout; generous because generation can be slow
    pub request_timeout: Duration,
}

impl EngineConfig {
    /// Create a config for the given backend base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Attach a bearer token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Base URL with any trailing slash removed
    pub fn get_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth_token: None,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(300),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let config = EngineConfig::new("http://localhost:8000/");
        assert_eq!(config.get_base_url(), "http://localhost:8000");
    }
}
