//! Server configuration parsed from environment variables.

use std::time::Duration;

use crate::page::static_engine::StaticEngineConfig;
use crate::services::extraction::ExtractionOptions;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SETTLE_MS: u64 = 1500;
pub const DEFAULT_BUDGET_SECS: u64 = 60;
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

impl crate::extract::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Zero { .. } => "E_CONFIG_ZERO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub extraction: ExtractionOptions,
    pub engine: StaticEngineConfig,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `EXTRACT_NAVIGATION_TIMEOUT_SECS`: default 30
    /// - `EXTRACT_SETTLE_MS`: default 1500
    /// - `EXTRACT_BUDGET_SECS`: default 60, must be non-zero
    /// - `EXTRACT_USER_AGENT`: desktop Chrome UA when absent
    /// - `EXTRACT_MAX_REDIRECTS`: default 5
    ///
    /// Unparseable numbers fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Zero`] for a zero request budget.
    pub fn from_env() -> Result<Self, ConfigError> {
        let budget_secs = env_parse("EXTRACT_BUDGET_SECS", DEFAULT_BUDGET_SECS);
        if budget_secs == 0 {
            return Err(ConfigError::Zero { var: "EXTRACT_BUDGET_SECS" });
        }

        let user_agent = std::env::var("EXTRACT_USER_AGENT")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned());

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT),
            extraction: ExtractionOptions {
                navigation_timeout: Duration::from_secs(env_parse(
                    "EXTRACT_NAVIGATION_TIMEOUT_SECS",
                    DEFAULT_NAVIGATION_TIMEOUT_SECS,
                )),
                settle_delay: Duration::from_millis(env_parse("EXTRACT_SETTLE_MS", DEFAULT_SETTLE_MS)),
                budget: Duration::from_secs(budget_secs),
            },
            engine: StaticEngineConfig {
                user_agent,
                max_redirects: env_parse("EXTRACT_MAX_REDIRECTS", DEFAULT_MAX_REDIRECTS),
            },
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
