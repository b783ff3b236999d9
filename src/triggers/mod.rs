/// Anomaly detector engine and rule implementations
pub mod detector;
pub mod rules;

pub use detector::{AnomalyDetector, DetectionRule};
pub use rules::{NegativeSentimentRule, PlatformSpikeRule, TopicTrendRule, VolumeSpikeRule};
