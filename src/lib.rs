/// Error types for the mention monitor
pub mod error;

/// Mention, alert and label types
pub mod events;

/// Lexicon-based sentiment and topic classification
pub mod classifier;

/// Mention producers
pub mod sources;

/// Bounded mention window and rolling statistics
pub mod aggregator;

/// Anomaly detection rules
pub mod triggers;

/// Alert retention and deduplication
pub mod alerts;

/// Pipeline orchestration and lifecycle
pub mod monitoring;

/// Read-side mention filtering
pub mod filter;

/// Configuration management
pub mod config;

// Re-export commonly used types
pub use error::{ConfigError, MonitorError, SourceError};
pub use events::{Alert, AlertType, Mention, Platform, RawMention, Sentiment, Severity, Topic};
pub use monitoring::{MonitorSnapshot, MonitorStatus, MonitoringController, TickOutcome};
