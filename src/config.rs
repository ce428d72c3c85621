//! Gateway configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::time::Duration;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::SAGA_UPSTREAM_CALLS;

/// Settings for the gateway and the in-process services.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct GatewayConfig {
    /// Base URL of the game-state service.
    #[serde(default = "default_games_url")]
    games_url: String,

    /// Base URL of the player-ranking service.
    #[serde(default = "default_players_url")]
    players_url: String,

    /// Bound on each backing-service call, in milliseconds.
    #[serde(default = "default_upstream_timeout_ms")]
    upstream_timeout_ms: u64,

    /// Seconds between reconciliation passes.
    #[serde(default = "default_reconcile_interval_secs")]
    reconcile_interval_secs: u64,

    /// Seconds a completed game's results must wait before reconciliation.
    /// Must cover a full inline saga, see [`GatewayConfig::validate`].
    #[serde(default = "default_reconcile_grace_secs")]
    reconcile_grace_secs: u64,

    /// JSON file backing the player registry.
    #[serde(default = "default_players_file")]
    players_file: PathBuf,
}

fn default_games_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_players_url() -> String {
    "http://127.0.0.1:8082".to_string()
}

fn default_upstream_timeout_ms() -> u64 {
    5_000
}

fn default_reconcile_interval_secs() -> u64 {
    30
}

fn default_reconcile_grace_secs() -> u64 {
    60
}

fn default_players_file() -> PathBuf {
    PathBuf::from("players.json")
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            games_url: default_games_url(),
            players_url: default_players_url(),
            upstream_timeout_ms: default_upstream_timeout_ms(),
            reconcile_interval_secs: default_reconcile_interval_secs(),
            reconcile_grace_secs: default_reconcile_grace_secs(),
            players_file: default_players_file(),
        }
    }
}

impl GatewayConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(games_url = %config.games_url, players_url = %config.players_url, "Config loaded");
        Ok(config)
    }

    /// Loads `path` if it exists, defaults otherwise.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Parses configuration from TOML text and validates it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that reconciliation cannot replay a side whose inline saga may
    /// still be running.
    ///
    /// The grace period must be at least [`SAGA_UPSTREAM_CALLS`] upstream
    /// timeouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let saga_bound = self.upstream_timeout() * SAGA_UPSTREAM_CALLS;
        if self.reconcile_grace() < saga_bound {
            return Err(ConfigError::new(format!(
                "reconcile_grace_secs ({}) must be at least {} upstream timeouts ({:?})",
                self.reconcile_grace_secs, SAGA_UPSTREAM_CALLS, saga_bound
            )));
        }
        Ok(())
    }

    /// Per-call upstream timeout.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_millis(self.upstream_timeout_ms)
    }

    /// Interval between reconciliation passes.
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_secs)
    }

    /// Minimum age of a pending result before reconciliation.
    pub fn reconcile_grace(&self) -> Duration {
        Duration::from_secs(self.reconcile_grace_secs)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
