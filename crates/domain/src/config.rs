//! Environment-driven configuration structures shared by the workspace
//! binaries.

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Configuration required by the API binary (HTTP bind target) so the HTTP
/// surface does not depend on monitor-only environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    bind_address: String,
}

impl ApiConfig {
    /// Loads only the environment variables required by the API surface.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        hydrate_env_file()?;

        Ok(Self {
            bind_address: get_required_var("API_BIND_ADDRESS")?,
        })
    }

    pub fn bind_address(&self) -> &str {
        &self.bind_address
    }
}

/// Configuration for the polling monitor: node endpoint, poll cadence and
/// the per-request RPC timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    rpc_url: String,
    poll_interval: Duration,
    rpc_timeout: Duration,
}

impl MonitorConfig {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15);
    pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

    /// Loads the monitor knobs. `ETH_RPC_URL` is required; poll interval and
    /// RPC timeout fall back to defaults when unset.
    pub fn load_from_env() -> Result<Self, ConfigError> {
        hydrate_env_file()?;

        Ok(Self {
            rpc_url: get_required_var("ETH_RPC_URL")?,
            poll_interval: get_duration_var("POLL_INTERVAL_SECS", Self::DEFAULT_POLL_INTERVAL)?,
            rpc_timeout: get_duration_var("RPC_TIMEOUT_SECS", Self::DEFAULT_RPC_TIMEOUT)?,
        })
    }

    /// Builds a config directly, bypassing the environment. Used by tests
    /// and by callers embedding the monitor with hand-picked settings.
    pub fn new(
        rpc_url: impl Into<String>,
        poll_interval: Duration,
        rpc_timeout: Duration,
    ) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            poll_interval,
            rpc_timeout,
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn rpc_timeout(&self) -> Duration {
        self.rpc_timeout
    }
}

fn get_required_var(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(ConfigError::MissingVar { key })
            } else {
                Ok(trimmed.to_string())
            }
        }
        Err(_) => Err(ConfigError::MissingVar { key }),
    }
}

fn get_duration_var(key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => {
            let seconds: u64 =
                value
                    .trim()
                    .parse()
                    .map_err(|source| ConfigError::InvalidNumber { key, source })?;
            Ok(Duration::from_secs(seconds))
        }
        _ => Ok(default),
    }
}

pub fn hydrate_env_file() -> Result<(), ConfigError> {
    if env::var_os("BLOCKWATCH_SKIP_DOTENV").is_some() {
        return Ok(());
    }
    match dotenvy::dotenv() {
        Ok(_) => {}
        Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(ConfigError::Dotenv { source: err }),
    }

    Ok(())
}

/// Errors emitted when `.env` hydration or environment parsing fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{key}`")]
    MissingVar { key: &'static str },
    #[error("invalid integer in `{key}`: {source}")]
    InvalidNumber {
        key: &'static str,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to load .env file: {source}")]
    Dotenv {
        #[from]
        source: dotenvy::Error,
    },
}
