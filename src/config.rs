//! Centralized configuration management for marsfeed

use std::time::Duration;
use anyhow::{Result, Context};

use crate::mars::MarsApi;
use crate::overview::ControllerOptions;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Mars real-estate API
    pub base_url: String,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Fetch behaviour of the overview controller
    pub feed: FeedConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

/// Overview controller switches. Both are off by default.
#[derive(Debug, Clone, Default)]
pub struct FeedConfig {
    /// Drop completions of fetches that a newer fetch has superseded
    pub discard_superseded: bool,
    /// Publish `Loading` and `Done` around each fetch
    pub track_progress: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "marsfeed/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: MarsApi::BASE_URL.to_string(),
            http: HttpConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("MARSFEED_BASE_URL")
            .unwrap_or_else(|_| MarsApi::BASE_URL.to_string());

        let http = HttpConfig {
            timeout_seconds: parse_env_var("MARSFEED_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: std::env::var("MARSFEED_USER_AGENT")
                .unwrap_or_else(|_| "marsfeed/0.1.0".to_string()),
        };

        let feed = FeedConfig {
            discard_superseded: parse_env_var("MARSFEED_DISCARD_SUPERSEDED")?.unwrap_or(false),
            track_progress: parse_env_var("MARSFEED_TRACK_PROGRESS")?.unwrap_or(false),
        };

        Ok(Config {
            base_url,
            http,
            feed,
        })
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Options handed to the overview controller
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            discard_superseded: self.feed.discard_superseded,
            track_progress: self.feed.track_progress,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid base URL: {}", self.base_url))?;

        if url.cannot_be_a_base() {
            return Err(anyhow::anyhow!(
                "Base URL cannot be used to build API paths: {}",
                self.base_url
            ));
        }

        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://mars.udacity.com/");
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert!(!config.feed.discard_superseded);
        assert!(!config.feed.track_progress);
    }

    #[test]
    fn test_config_validation() {
        Config::default().validate().unwrap();

        let bad_url = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(bad_url.validate().is_err());

        let no_timeout = Config {
            http: HttpConfig {
                timeout_seconds: 0,
                ..HttpConfig::default()
            },
            ..Config::default()
        };
        assert!(no_timeout.validate().is_err());
    }

    #[test]
    fn test_controller_options_follow_feed_config() {
        let config = Config {
            feed: FeedConfig {
                discard_superseded: true,
                track_progress: false,
            },
            ..Config::default()
        };
        let options = config.controller_options();
        assert!(options.discard_superseded);
        assert!(!options.track_progress);
    }
}
