//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/jobtrail/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/jobtrail/` (~/.config/jobtrail/)
//! - Data: `$XDG_DATA_HOME/jobtrail/` (~/.local/share/jobtrail/)
//! - State/Logs: `$XDG_STATE_HOME/jobtrail/` (~/.local/state/jobtrail/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Activity feed configuration
    #[serde(default)]
    pub activity: ActivityConfig,

    /// Follow-up reminder configuration
    #[serde(default)]
    pub reminders: ReminderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Activity feed configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ActivityConfig {
    /// Whether the dashboard re-fetches the feed on a timer
    #[serde(default = "default_auto_refresh")]
    pub auto_refresh: bool,

    /// Seconds between automatic feed refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            auto_refresh: default_auto_refresh(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

fn default_auto_refresh() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    30
}

/// Follow-up reminder configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ReminderConfig {
    /// Create a follow-up reminder when an application is added with an
    /// applied date
    #[serde(default = "default_follow_up")]
    pub follow_up: bool,

    /// Working days (Mon-Fri) between applying and the follow-up
    #[serde(default = "default_follow_up_days")]
    pub follow_up_working_days: u32,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            follow_up: default_follow_up(),
            follow_up_working_days: default_follow_up_days(),
        }
    }
}

fn default_follow_up() -> bool {
    true
}

fn default_follow_up_days() -> u32 {
    3
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration, returning an error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.activity.refresh_interval_secs == 0 {
            return Err(Error::Config(
                "activity.refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.reminders.follow_up_working_days == 0 {
            return Err(Error::Config(
                "reminders.follow_up_working_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/jobtrail/config.toml` (~/.config/jobtrail/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("jobtrail").join("config.toml")
    }

    /// Returns the data directory path (for the SQLite database)
    ///
    /// `$XDG_DATA_HOME/jobtrail/` (~/.local/share/jobtrail/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("jobtrail")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/jobtrail/` (~/.local/state/jobtrail/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("jobtrail")
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/jobtrail/data.db` (~/.local/share/jobtrail/data.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("data.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/jobtrail/jobtrail.log` (~/.local/state/jobtrail/jobtrail.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("jobtrail.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path
    /// behavior before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.activity.auto_refresh);
        assert_eq!(config.activity.refresh_interval_secs, 30);
        assert!(config.reminders.follow_up);
        assert_eq!(config.reminders.follow_up_working_days, 3);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[activity]
auto_refresh = false
refresh_interval_secs = 10

[reminders]
follow_up_working_days = 5

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert!(!config.activity.auto_refresh);
        assert_eq!(config.activity.refresh_interval_secs, 10);
        assert!(config.reminders.follow_up);
        assert_eq!(config.reminders.follow_up_working_days, 5);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_zero_refresh_interval_rejected() {
        let config: Config = toml::from_str("[activity]\nrefresh_interval_secs = 0\n").unwrap();
        assert!(config.validate().is_err());
    }
}
