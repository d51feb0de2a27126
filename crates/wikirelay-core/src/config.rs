//! Environment-driven configuration for the outbound collaborators.
//!
//! Configuration is constructed once at process start and injected into
//! the gateway and inference clients. Nothing in this crate reads the
//! environment after startup.

use base64::Engine;

use crate::defaults;
use crate::error::{Error, Result};

/// Connection settings for the content platform's REST API.
#[derive(Debug, Clone)]
pub struct ContentConfig {
    /// Base URL of the platform, without a trailing slash.
    pub base_url: String,
    /// Account email for the Basic credential.
    pub email: String,
    /// API token for the Basic credential.
    pub api_token: String,
    /// Default space key for create/copy operations that omit one.
    pub space_key: String,
}

impl ContentConfig {
    /// Read configuration from the environment.
    ///
    /// Required: `CONFLUENCE_BASE_URL`, `CONFLUENCE_EMAIL`,
    /// `CONFLUENCE_API_TOKEN`, `CONFLUENCE_SPACE_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: require_env("CONFLUENCE_BASE_URL")?,
            email: require_env("CONFLUENCE_EMAIL")?,
            api_token: require_env("CONFLUENCE_API_TOKEN")?,
            space_key: require_env("CONFLUENCE_SPACE_KEY")?,
        })
    }

    /// `Authorization` header value: Basic credential from `email:token`.
    pub fn auth_header(&self) -> String {
        let credential = format!("{}:{}", self.email, self.api_token);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credential)
        )
    }

    /// Root of the content REST resource.
    pub fn api_base(&self) -> String {
        format!("{}/rest/api/content", self.base_url)
    }
}

/// Connection settings for the text-generation API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base URL (overridable for tests).
    pub base_url: String,
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Generation model name.
    pub model: String,
}

impl GeminiConfig {
    /// Read configuration from the environment.
    ///
    /// Required: `GEMINI_API_KEY`. Optional: `GEMINI_BASE_URL`,
    /// `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| defaults::GEMINI_BASE_URL.to_string()),
            api_key: require_env("GEMINI_API_KEY")?,
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| defaults::GEMINI_MODEL.to_string()),
        })
    }

    /// Create a config with explicit values (used by tests).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: defaults::GEMINI_MODEL.to_string(),
        }
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{} environment variable is not set", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ContentConfig {
        ContentConfig {
            base_url: "https://wiki.example.com".to_string(),
            email: "user@example.com".to_string(),
            api_token: "token123".to_string(),
            space_key: "ENG".to_string(),
        }
    }

    #[test]
    fn test_auth_header_is_basic_base64() {
        let config = test_config();
        // base64("user@example.com:token123")
        assert_eq!(
            config.auth_header(),
            "Basic dXNlckBleGFtcGxlLmNvbTp0b2tlbjEyMw=="
        );
    }

    #[test]
    fn test_api_base_appends_rest_path() {
        let config = test_config();
        assert_eq!(
            config.api_base(),
            "https://wiki.example.com/rest/api/content"
        );
    }

    #[test]
    fn test_gemini_config_new_uses_default_model() {
        let config = GeminiConfig::new("http://localhost:9999", "key");
        assert_eq!(config.model, defaults::GEMINI_MODEL);
        assert_eq!(config.base_url, "http://localhost:9999");
    }
}
