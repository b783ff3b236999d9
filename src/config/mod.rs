//! Configuration management
//!
//! Configuration is read from a TOML file. Every section and key is optional
//! and falls back to the defaults below.

pub mod sections;

pub use sections::{
    AlertsConfig, DetectorConfig, MonitoringConfig, SourceConfig, MAX_TICK_INTERVAL_MS,
    MAX_WINDOW_SECONDS,
};

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub monitoring: MonitoringConfig,
    pub alerts: AlertsConfig,
    pub detector: DetectorConfig,
    pub source: SourceConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read, a parse
    /// error for malformed TOML, or `ConfigError::ValidationError` for
    /// out-of-range values.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitoring.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "monitoring.tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.monitoring.tick_interval_ms > MAX_TICK_INTERVAL_MS {
            return Err(ConfigError::ValidationError(format!(
                "monitoring.tick_interval_ms must be at most {}, got {}",
                MAX_TICK_INTERVAL_MS, self.monitoring.tick_interval_ms
            )));
        }
        if self.monitoring.window_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "monitoring.window_capacity must be greater than zero".to_string(),
            ));
        }
        if self.alerts.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "alerts.capacity must be greater than zero".to_string(),
            ));
        }
        if self.detector.volume_bucket_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "detector.volume_bucket_seconds must be greater than zero".to_string(),
            ));
        }

        let windows = [
            ("alerts.dedup_window_seconds", self.alerts.dedup_window_seconds),
            ("detector.volume_bucket_seconds", self.detector.volume_bucket_seconds),
        ];
        for (name, value) in windows {
            if value > MAX_WINDOW_SECONDS {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be at most {}, got {}",
                    name, MAX_WINDOW_SECONDS, value
                )));
            }
        }

        let percentages = [
            ("detector.negative_threshold_pct", self.detector.negative_threshold_pct),
            ("detector.platform_threshold_pct", self.detector.platform_threshold_pct),
            ("detector.topic_threshold_pct", self.detector.topic_threshold_pct),
        ];
        for (name, value) in percentages {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be between 0 and 100, got {}",
                    name, value
                )));
            }
        }

        if let SourceConfig::JsonLines { path } = &self.source {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "source.path must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
