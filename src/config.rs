//! Configuration for the ledger client and polling engine.

use crate::ConfigError;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_connect4::Address;
use tracing::{debug, info, instrument};

/// Environment variable consulted when the file names no account.
pub const ACCOUNT_ENV: &str = "STRICTLY_ACCOUNT";

/// Shortest move allowance the lobby accepts, in seconds.
pub const MIN_TIMEOUT_SECS: i64 = 60;

/// Configuration for talking to the ledger gateway.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Base URL of the ledger gateway.
    gateway_url: String,

    /// Local account address; falls back to `STRICTLY_ACCOUNT`.
    #[serde(default)]
    account: Option<Address>,

    /// Milliseconds between snapshot fetches.
    #[serde(default = "default_poll_interval_ms")]
    poll_interval_ms: u64,

    /// Milliseconds between local countdown ticks.
    #[serde(default = "default_tick_interval_ms")]
    tick_interval_ms: u64,

    /// Per-request timeout applied by the HTTP client.
    #[serde(default = "default_request_timeout_ms")]
    request_timeout_ms: u64,

    /// Move allowance used when creating or matching games.
    #[serde(default = "default_timeout_secs")]
    default_timeout_secs: i64,
}

#[instrument]
fn default_poll_interval_ms() -> u64 {
    5_000
}

#[instrument]
fn default_tick_interval_ms() -> u64 {
    1_000
}

#[instrument]
fn default_request_timeout_ms() -> u64 {
    10_000
}

#[instrument]
fn default_timeout_secs() -> i64 {
    MIN_TIMEOUT_SECS
}

impl LedgerConfig {
    /// Creates a configuration with default timings.
    #[instrument(skip(gateway_url, account))]
    pub fn new(gateway_url: String, account: Option<Address>) -> Self {
        Self {
            gateway_url,
            account,
            poll_interval_ms: default_poll_interval_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            default_timeout_secs: default_timeout_secs(),
        }
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(gateway_url = %config.gateway_url, "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        if config.account.is_none() {
            config.account = std::env::var(ACCOUNT_ENV).ok().map(Address::new);
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 || self.tick_interval_ms == 0 {
            return Err(ConfigError::new("Poll and tick intervals must be non-zero"));
        }
        if self.gateway_url.is_empty() {
            return Err(ConfigError::new("gateway_url must not be empty"));
        }
        Ok(())
    }

    /// Local account, or an error naming how to set one.
    #[instrument(skip(self))]
    pub fn require_account(&self) -> Result<&Address, ConfigError> {
        self.account.as_ref().ok_or_else(|| {
            ConfigError::new(format!(
                "No account configured: set `account` in the config file or {}",
                ACCOUNT_ENV
            ))
        })
    }

    /// Interval between snapshot fetches.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Interval between local countdown ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
