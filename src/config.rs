//! Runtime configuration.
//!
//! Values come from an optional YAML file and are then overridden by CLI
//! flags and environment variables (see [`crate::cli::Cli`]).
//!
//! ```yaml
//! endpoint_url: https://api.openai.com/v1/responses
//! model: gpt-4o
//! tier_timeout_secs: 90
//! ```

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_ENDPOINT_URL: &str = "https://api.openai.com/v1/responses";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    pub endpoint_url: String,
    pub model: String,
    /// Bearer token. Usually supplied through `OPENAI_API_KEY` rather than the file.
    pub api_key: Option<String>,
    /// Deadline for one tier attempt, covering the request and body download.
    pub tier_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            tier_timeout_secs: 90,
            connect_timeout_secs: 10,
        }
    }
}

impl std::fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("tier_timeout_secs", &self.tier_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

impl FeedConfig {
    /// Load configuration from a YAML file. Missing keys take their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path))]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_string(),
                source,
            })?;
        let config = Self::from_yaml(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })?;
        info!(endpoint = %config.endpoint_url, model = %config.model, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    pub fn tier_timeout(&self) -> Duration {
        Duration::from_secs(self.tier_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// The API key, if present and not blank.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT_URL);
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.tier_timeout(), Duration::from_secs(90));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = FeedConfig::from_yaml("model: gpt-4.1\ntier_timeout_secs: 30\n").unwrap();
        assert_eq!(config.model, "gpt-4.1");
        assert_eq!(config.tier_timeout_secs, 30);
        assert_eq!(config.endpoint_url, DEFAULT_ENDPOINT_URL);
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let mut config = FeedConfig::default();
        assert!(matches!(config.require_api_key(), Err(ConfigError::MissingApiKey)));

        config.api_key = Some("   ".to_string());
        assert!(matches!(config.require_api_key(), Err(ConfigError::MissingApiKey)));

        config.api_key = Some("sk-test".to_string());
        assert_eq!(config.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = FeedConfig {
            api_key: Some("sk-secret".to_string()),
            ..FeedConfig::default()
        };
        let out = format!("{config:?}");
        assert!(!out.contains("sk-secret"));
        assert!(out.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = FeedConfig::load("/nonexistent/topic_feed.yaml").await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "endpoint_url: http://localhost:9000/v1/responses\n").unwrap();

        let config = FeedConfig::load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(config.endpoint_url, "http://localhost:9000/v1/responses");
    }
}
