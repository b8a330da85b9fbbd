//! Configuration for the fundscan services.
//!
//! One `Config` struct is built at process start and passed by reference into
//! each component constructor. Business logic never reads the environment or
//! any other ambient source itself.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Cloud agent service configuration (primary reporting backend).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudAgentConfig {
    /// Service endpoint, e.g. `https://agents.example.com`
    pub endpoint: String,
    /// Connection credential
    pub api_key: String,
    /// Model deployed behind the agent service
    pub model: String,
    /// Fixed sleep between run-status polls, in milliseconds
    pub poll_interval_ms: u64,
    /// Maximum number of run-status polls before the run is abandoned
    pub max_poll_attempts: u32,
}

/// Hosted chat completion configuration (secondary reporting backend).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionConfig {
    /// API key
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature (0.0 - 1.0)
    pub temperature: f64,
    /// Maximum tokens to generate
    pub max_tokens: i64,
}

/// Top-level configuration for the portfolio scanner.
///
/// Both backend sections are optional: absence of credentials is not an
/// error, it selects the local fallback report generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Primary reporting backend, used when configured
    pub cloud_agent: Option<CloudAgentConfig>,
    /// Secondary reporting backend, used when the primary is unavailable
    pub chat_completion: Option<ChatCompletionConfig>,
    /// Base log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format ("pretty" or "json")
    pub log_format: String,
}

const DEFAULT_CHAT_MODEL: &str = "gpt-4o";
const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

impl Config {
    /// Build the configuration from environment variables.
    ///
    /// Recognized variables:
    /// - `AGENT_SERVICE_ENDPOINT`, `AGENT_SERVICE_API_KEY`, `AGENT_SERVICE_MODEL`
    /// - `AGENT_POLL_INTERVAL_MS`, `AGENT_MAX_POLL_ATTEMPTS`
    /// - `OPENAI_API_KEY`, `OPENAI_CHAT_MODEL_ID`
    /// - `FUNDSCAN_LOG_LEVEL`, `FUNDSCAN_LOG_FORMAT`
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            log_level: "info".into(),
            log_format: "pretty".into(),
            ..Self::default()
        };

        if let (Ok(endpoint), Ok(api_key)) = (
            std::env::var("AGENT_SERVICE_ENDPOINT"),
            std::env::var("AGENT_SERVICE_API_KEY"),
        ) {
            if !endpoint.trim().is_empty() && !api_key.trim().is_empty() {
                config.cloud_agent = Some(CloudAgentConfig {
                    endpoint,
                    api_key,
                    model: std::env::var("AGENT_SERVICE_MODEL")
                        .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.into()),
                    poll_interval_ms: parse_env("AGENT_POLL_INTERVAL_MS")?
                        .unwrap_or(DEFAULT_POLL_INTERVAL_MS),
                    max_poll_attempts: parse_env("AGENT_MAX_POLL_ATTEMPTS")?
                        .unwrap_or(DEFAULT_MAX_POLL_ATTEMPTS),
                });
            }
        }

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            if !api_key.trim().is_empty() {
                config.chat_completion = Some(ChatCompletionConfig {
                    api_key,
                    model: std::env::var("OPENAI_CHAT_MODEL_ID")
                        .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.into()),
                    temperature: 0.2,
                    max_tokens: 4_096,
                });
            }
        }

        if let Ok(level) = std::env::var("FUNDSCAN_LOG_LEVEL") {
            config.log_level = level;
        }
        if let Ok(format) = std::env::var("FUNDSCAN_LOG_FORMAT") {
            config.log_format = format;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration, failing fast on malformed values.
    pub fn validate(&self) -> Result<()> {
        const VALID_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        if !VALID_LEVELS.contains(&self.log_level.as_str()) {
            return Err(Error::InvalidArgument(format!(
                "log_level must be one of {VALID_LEVELS:?}, got '{}'",
                self.log_level
            )));
        }

        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            return Err(Error::InvalidArgument(format!(
                "log_format must be 'pretty' or 'json', got '{}'",
                self.log_format
            )));
        }

        if let Some(agent) = &self.cloud_agent {
            if agent.max_poll_attempts == 0 {
                return Err(Error::InvalidArgument(
                    "max_poll_attempts must be at least 1".into(),
                ));
            }
        }

        if let Some(chat) = &self.chat_completion {
            if !(0.0..=1.0).contains(&chat.temperature) {
                return Err(Error::InvalidArgument(format!(
                    "temperature must be in [0.0, 1.0], got {}",
                    chat.temperature
                )));
            }
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidArgument(format!("{name} has invalid value '{raw}'"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            log_level: "info".into(),
            log_format: "pretty".into(),
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config_validates() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config = Config {
            log_level: "verbose".into(),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_poll_attempts_rejected() {
        let config = Config {
            cloud_agent: Some(CloudAgentConfig {
                endpoint: "https://agents.example.com".into(),
                api_key: "key".into(),
                model: "gpt-4o".into(),
                poll_interval_ms: 100,
                max_poll_attempts: 0,
            }),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let config = Config {
            chat_completion: Some(ChatCompletionConfig {
                api_key: "key".into(),
                model: "gpt-4o".into(),
                temperature: 1.5,
                max_tokens: 1024,
            }),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_credentials_is_not_an_error() {
        // No backend sections configured: fallback selection, not a failure.
        let config = base_config();
        assert!(config.cloud_agent.is_none());
        assert!(config.chat_completion.is_none());
        assert!(config.validate().is_ok());
    }
}
