//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/editpulse/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/editpulse/` (~/.config/editpulse/)
//! - State/Logs: `$XDG_STATE_HOME/editpulse/` (~/.local/state/editpulse/)

use crate::error::{Error, Result};
use crate::pipeline::SummaryOptions;
use crate::types::{DedupScope, TimeThreshold};
use serde::Deserialize;
use std::path::{Path, PathBuf};

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

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Session detection settings
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Session detection settings
#[derive(Debug, Deserialize)]
pub struct SummaryConfig {
    /// Largest gap in minutes between two edits of the same session
    #[serde(default = "default_time_threshold_minutes")]
    pub time_threshold_minutes: f64,

    /// Where duplicate timestamps are detected: "global" or "per_user"
    #[serde(default)]
    pub dedup_scope: DedupScope,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            time_threshold_minutes: default_time_threshold_minutes(),
            dedup_scope: DedupScope::default(),
        }
    }
}

impl SummaryConfig {
    /// Validate into pipeline options.
    pub fn options(&self) -> Result<SummaryOptions> {
        let threshold = TimeThreshold::from_minutes(self.time_threshold_minutes)
            .map_err(|e| Error::Config(format!("summary.time_threshold_minutes: {}", e)))?;
        Ok(SummaryOptions::new(threshold).with_dedup_scope(self.dedup_scope))
    }
}

fn default_time_threshold_minutes() -> f64 {
    30.0
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
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
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/editpulse/config.toml` (~/.config/editpulse/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("editpulse").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/editpulse/` (~/.local/state/editpulse/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("editpulse")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/editpulse/editpulse.log` (~/.local/state/editpulse/editpulse.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("editpulse.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.summary.time_threshold_minutes, 30.0);
        assert_eq!(config.summary.dedup_scope, DedupScope::Global);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[summary]
time_threshold_minutes = 45
dedup_scope = "per_user"

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.summary.time_threshold_minutes, 45.0);
        assert_eq!(config.summary.dedup_scope, DedupScope::PerUser);
        assert_eq!(config.logging.level, "debug");

        let options = config.summary.options().unwrap();
        assert_eq!(options.threshold.minutes(), 45.0);
        assert_eq!(options.dedup_scope, DedupScope::PerUser);
    }

    #[test]
    fn test_invalid_threshold_is_config_error() {
        let toml = r#"
[summary]
time_threshold_minutes = -1
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(matches!(config.summary.options(), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_dedup_scope_is_rejected() {
        let toml = r#"
[summary]
dedup_scope = "everywhere"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[summary]\ntime_threshold_minutes = 10.5\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.summary.time_threshold_minutes, 10.5);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_log_path() {
        assert!(Config::log_path().ends_with("editpulse/editpulse.log"));
    }
}
