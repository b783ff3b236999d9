use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Upper bound for every second-valued window setting (one day)
pub const MAX_WINDOW_SECONDS: u64 = 86_400;

/// Upper bound for the tick interval (one hour)
pub const MAX_TICK_INTERVAL_MS: u64 = 3_600_000;

fn bounded_seconds(seconds: u64) -> chrono::Duration {
    chrono::Duration::seconds(seconds.min(MAX_WINDOW_SECONDS) as i64)
}

/// Tick cadence and window sizing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Interval between ticks while monitoring
    pub tick_interval_ms: u64,
    /// Maximum number of mentions kept in the window
    pub window_capacity: usize,
    /// Mentions drawn to seed the window before streaming starts
    pub initial_batch: usize,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2500,
            window_capacity: 200,
            initial_batch: 20,
        }
    }
}

impl MonitoringConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Alert retention and deduplication
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertsConfig {
    /// Maximum number of alerts retained
    pub capacity: usize,
    /// Same-type alerts closer together than this are dropped
    pub dedup_window_seconds: u64,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            capacity: 10,
            dedup_window_seconds: 30,
        }
    }
}

impl AlertsConfig {
    /// Dedup window, capped at `MAX_WINDOW_SECONDS`
    pub fn dedup_window(&self) -> chrono::Duration {
        bounded_seconds(self.dedup_window_seconds)
    }
}

/// Anomaly rule thresholds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Width of each volume-spike time bucket
    pub volume_bucket_seconds: u64,
    pub negative_threshold_pct: f64,
    pub platform_threshold_pct: f64,
    pub topic_threshold_pct: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            volume_bucket_seconds: 25,
            negative_threshold_pct: 40.0,
            platform_threshold_pct: 50.0,
            topic_threshold_pct: 40.0,
        }
    }
}

impl DetectorConfig {
    /// Volume-spike bucket width, capped at `MAX_WINDOW_SECONDS`
    pub fn volume_bucket(&self) -> chrono::Duration {
        bounded_seconds(self.volume_bucket_seconds)
    }
}

/// Where mentions come from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Random mentions from the built-in templates
    Synthetic {
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Newline-delimited JSON feed file
    JsonLines { path: PathBuf },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Synthetic { seed: None }
    }
}
