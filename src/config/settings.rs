//! Configuration settings for sigwatch.

use crate::poller::{Password, PollConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `poll.password`.
pub const PASSWORD_ENV: &str = "SIGWATCH_PASSWORD";

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint and cadence.
    pub poll: PollSettings,
    /// Alert policy and persistence.
    pub alerts: AlertSettings,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file.
    ///
    /// The password is taken from `SIGWATCH_PASSWORD` when that variable is set.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(super::default_config_path);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        if let Ok(password) = std::env::var(PASSWORD_ENV) {
            config.poll.password = Password::new(password);
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::config(e.to_string()))
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<PathBuf> {
        let config_path = path.unwrap_or_else(super::default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(config_path)
    }

    /// Resolved path of the persisted alert state.
    pub fn alert_state_path(&self) -> PathBuf {
        self.alerts
            .state_path
            .clone()
            .unwrap_or_else(|| data_file("alert_state.json"))
    }

    /// Resolved path of the last-known status snapshot.
    pub fn snapshot_path(&self) -> PathBuf {
        self.alerts
            .snapshot_path
            .clone()
            .unwrap_or_else(|| data_file("last_known.json"))
    }
}

fn data_file(name: &str) -> PathBuf {
    super::data_dir()
        .map(|dir| dir.join(name))
        .unwrap_or_else(|_| Path::new(".").join(name))
}

/// Poll configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Signal endpoint URL.
    pub endpoint: String,
    /// Basic auth user.
    pub username: String,
    /// Basic auth password.
    pub password: Password,
    /// Seconds between polls. Values below 5 are raised to 5.
    pub interval_secs: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://eelde-koivisto.se/_API/mobile/get_latest.php".to_string(),
            username: "testuser".to_string(),
            password: Password::default(),
            interval_secs: 10,
        }
    }
}

impl PollSettings {
    /// Build the immutable per-run configuration.
    pub fn to_poll_config(&self) -> PollConfig {
        PollConfig::new(
            self.endpoint.clone(),
            self.username.clone(),
            self.password.clone(),
            self.interval_secs,
        )
    }
}

/// Alert configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    /// Minimum seconds between two alerts for an unchanged signal.
    pub cooldown_secs: u64,
    /// Where the alert state is persisted (defaults to the data directory).
    pub state_path: Option<PathBuf>,
    /// Where the last-known status snapshot is persisted (defaults to the data directory).
    pub snapshot_path: Option<PathBuf>,
    /// Ring the terminal bell when an alert fires.
    pub bell: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            cooldown_secs: crate::alert::COOLDOWN.as_secs(),
            state_path: None,
            snapshot_path: None,
            bell: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    /// Also write a daily-rolling log file into the data directory.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "sigwatch=info".to_string(),
            file: false,
        }
    }
}
