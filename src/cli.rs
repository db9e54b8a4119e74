//! Command-line interface definitions.
//!
//! Flags override values loaded from the optional YAML config file. The API
//! key is normally taken from `OPENAI_API_KEY`.

use crate::config::FeedConfig;
use clap::Parser;

/// Topic shown when no topic is given.
pub const DEFAULT_TOPIC: &str = "Artificial Intelligence";

/// Build ranked news feeds for one or more topics.
///
/// # Examples
///
/// ```sh
/// # One feed, JSON only
/// topic_feed "Quantum Computing" -j ./json
///
/// # Several feeds with Markdown pages and an index
/// topic_feed Rust WebAssembly -j ./json -m ./markdown
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Topics to fetch; duplicates are ignored case-insensitively
    pub topics: Vec<String>,

    /// Output directory for JSON feeds
    #[arg(short, long, default_value = "./feeds")]
    pub json_output_dir: String,

    /// Output directory for Markdown pages (disabled when omitted)
    #[arg(short, long)]
    pub markdown_output_dir: Option<String>,

    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// API key for the generative endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model identifier
    #[arg(long, env = "TOPIC_FEED_MODEL")]
    pub model: Option<String>,

    /// Responses endpoint URL
    #[arg(long, env = "TOPIC_FEED_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Deadline in seconds for each tier attempt
    #[arg(long)]
    pub tier_timeout_secs: Option<u64>,

    /// Number of topics fetched at once
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,
}

impl Cli {
    /// Apply flag and environment overrides on top of `config`.
    pub fn apply(&self, mut config: FeedConfig) -> FeedConfig {
        if let Some(key) = &self.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint_url = endpoint.clone();
        }
        if let Some(secs) = self.tier_timeout_secs {
            config.tier_timeout_secs = secs;
        }
        config
    }

    /// Requested topics, or the default topic when none were given.
    pub fn topics_or_default(&self) -> Vec<String> {
        if self.topics.is_empty() {
            vec![DEFAULT_TOPIC.to_string()]
        } else {
            self.topics.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "topic_feed",
            "Rust",
            "Quantum Computing",
            "--json-output-dir",
            "./json",
            "--markdown-output-dir",
            "./markdown",
        ]);

        assert_eq!(cli.topics, vec!["Rust", "Quantum Computing"]);
        assert_eq!(cli.json_output_dir, "./json");
        assert_eq!(cli.markdown_output_dir.as_deref(), Some("./markdown"));
        assert_eq!(cli.concurrency, 4);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(["topic_feed", "-j", "/tmp/json", "-m", "/tmp/markdown"]);
        assert_eq!(cli.json_output_dir, "/tmp/json");
        assert_eq!(cli.markdown_output_dir.as_deref(), Some("/tmp/markdown"));
    }

    #[test]
    fn test_default_topic() {
        let cli = Cli::parse_from(["topic_feed"]);
        assert_eq!(cli.topics_or_default(), vec![DEFAULT_TOPIC]);
    }

    #[test]
    fn test_apply_overrides() {
        let cli = Cli::parse_from([
            "topic_feed",
            "--api-key",
            "sk-flag",
            "--model",
            "gpt-4.1",
            "--endpoint",
            "http://localhost:8080/v1/responses",
            "--tier-timeout-secs",
            "15",
        ]);
        let config = cli.apply(FeedConfig::default());
        assert_eq!(config.api_key.as_deref(), Some("sk-flag"));
        assert_eq!(config.model, "gpt-4.1");
        assert_eq!(config.endpoint_url, "http://localhost:8080/v1/responses");
        assert_eq!(config.tier_timeout_secs, 15);
    }

    #[test]
    fn test_apply_keeps_file_values_without_flags() {
        let cli = Cli {
            topics: vec![],
            json_output_dir: "./feeds".to_string(),
            markdown_output_dir: None,
            config: None,
            api_key: None,
            model: None,
            endpoint: None,
            tier_timeout_secs: None,
            concurrency: 4,
        };
        let file = FeedConfig {
            model: "from-file".to_string(),
            ..FeedConfig::default()
        };
        assert_eq!(cli.apply(file).model, "from-file");
    }
}
