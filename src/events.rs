//! Core event types for the mention monitoring pipeline
//!
//! This module defines the data contract shared by every pipeline stage:
//! the classified `Mention`, the unclassified `RawMention` accepted from feeds,
//! and the `Alert` records produced by the detector and lifecycle events.

use crate::classifier::{classify_sentiment, classify_topic};
use crate::error::SourceError;
use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Timestamp type for consistent time handling across the application
pub type Timestamp = DateTime<Utc>;

/// Scores strictly above this are positive, strictly below its negation negative
pub const SENTIMENT_THRESHOLD: f64 = 0.2;

/// Channel a mention was observed on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    Twitter,
    Reddit,
    Facebook,
    LinkedIn,
    News,
    Blogs,
    Forums,
}

impl Platform {
    /// Every platform, in enumeration order
    pub const ALL: [Platform; 7] = [
        Platform::Twitter,
        Platform::Reddit,
        Platform::Facebook,
        Platform::LinkedIn,
        Platform::News,
        Platform::Blogs,
        Platform::Forums,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Reddit => "Reddit",
            Platform::Facebook => "Facebook",
            Platform::LinkedIn => "LinkedIn",
            Platform::News => "News",
            Platform::Blogs => "Blogs",
            Platform::Forums => "Forums",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment polarity derived from a mention's text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Label a normalized score using the fixed 0.2 threshold
    pub fn from_score(score: f64) -> Self {
        if score > SENTIMENT_THRESHOLD {
            Sentiment::Positive
        } else if score < -SENTIMENT_THRESHOLD {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discussion topic derived from a mention's text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Topic {
    #[serde(rename = "Product Quality")]
    ProductQuality,
    #[serde(rename = "Customer Service")]
    CustomerService,
    #[serde(rename = "Pricing")]
    Pricing,
    #[serde(rename = "Features")]
    Features,
    #[serde(rename = "Brand Image")]
    BrandImage,
    #[serde(rename = "Competition")]
    Competition,
    #[serde(rename = "Innovation")]
    Innovation,
}

impl Topic {
    /// Every topic, in the order used for tie-breaking
    pub const ALL: [Topic; 7] = [
        Topic::ProductQuality,
        Topic::CustomerService,
        Topic::Pricing,
        Topic::Features,
        Topic::BrandImage,
        Topic::Competition,
        Topic::Innovation,
    ];

    /// Topic assigned when no keyword matches
    pub const FALLBACK: Topic = Topic::BrandImage;

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::ProductQuality => "Product Quality",
            Topic::CustomerService => "Customer Service",
            Topic::Pricing => "Pricing",
            Topic::Features => "Features",
            Topic::BrandImage => "Brand Image",
            Topic::Competition => "Competition",
            Topic::Innovation => "Innovation",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unclassified mention as delivered by a feed
///
/// Only the observable fields are accepted here; sentiment and topic are
/// always derived by the classifier when the record becomes a `Mention`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawMention {
    /// Source-provided identifier, generated on ingestion when absent
    #[serde(default)]
    pub id: Option<String>,
    pub text: String,
    pub platform: Platform,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub reach: u64,
    #[serde(default)]
    pub engagement: u64,
    #[serde(default)]
    pub location: Option<String>,
    /// Creation time, ingestion time is used when absent
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl RawMention {
    /// Create a raw mention with empty metadata
    pub fn new(text: impl Into<String>, platform: Platform) -> Self {
        Self {
            id: None,
            text: text.into(),
            platform,
            author: String::new(),
            reach: 0,
            engagement: 0,
            location: None,
            timestamp: None,
        }
    }

    /// Set the creation time
    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// One ingested text event with derived classification
///
/// Immutable once created: fields are only readable, and the derived
/// `sentiment`, `sentiment_score` and `topic` always come from the classifier.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    id: String,
    text: String,
    platform: Platform,
    sentiment: Sentiment,
    sentiment_score: f64,
    topic: Topic,
    timestamp: Timestamp,
    author: String,
    reach: u64,
    engagement: u64,
    location: Option<String>,
}

impl Mention {
    /// Classify a raw mention
    ///
    /// # Errors
    ///
    /// Returns `SourceError::InvalidMention` if the text is empty or whitespace.
    pub fn classify(raw: RawMention) -> Result<Self, SourceError> {
        if raw.text.trim().is_empty() {
            return Err(SourceError::InvalidMention(
                "mention text must not be empty".to_string(),
            ));
        }

        let (sentiment, sentiment_score) = classify_sentiment(&raw.text);
        let topic = classify_topic(&raw.text);
        let timestamp = raw.timestamp.unwrap_or_else(Utc::now);
        let id = match raw.id {
            Some(id) => id,
            None => generate_mention_id(timestamp, &mut rand::thread_rng()),
        };

        Ok(Self {
            id,
            text: raw.text,
            platform: raw.platform,
            sentiment,
            sentiment_score,
            topic,
            timestamp,
            author: raw.author,
            reach: raw.reach,
            engagement: raw.engagement,
            location: raw.location,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    /// Normalized score in [-1, 1]
    pub fn sentiment_score(&self) -> f64 {
        self.sentiment_score
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn reach(&self) -> u64 {
        self.reach
    }

    pub fn engagement(&self) -> u64 {
        self.engagement
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

/// Build a mention id from creation time plus a random base36 suffix
pub fn generate_mention_id<R: Rng + ?Sized>(timestamp: Timestamp, rng: &mut R) -> String {
    let suffix: String = (0..9)
        .map(|_| (rng.sample(Alphanumeric) as char).to_ascii_lowercase())
        .collect();
    format!("{}-{}", timestamp.timestamp_millis(), suffix)
}

/// Kind of alert, one per detector rule plus lifecycle notices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    VolumeSpike,
    NegativeSentiment,
    PlatformSpike,
    TopicTrend,
    Info,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::VolumeSpike => "volume_spike",
            AlertType::NegativeSentiment => "negative_sentiment",
            AlertType::PlatformSpike => "platform_spike",
            AlertType::TopicTrend => "topic_trend",
            AlertType::Info => "info",
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity level for alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Lifecycle notice, no action required
    Info,
    /// Unusual concentration worth watching
    Medium,
    /// Anomaly requiring attention
    High,
    /// Anomaly requiring immediate attention
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static ALERT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Alert raised by a detector rule or a lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Human-readable message carrying the computed evidence
    pub message: String,
    pub timestamp: Timestamp,
    pub severity: Severity,
    /// Rule-specific evidence fields
    pub data: serde_json::Value,
}

impl Alert {
    /// Create an alert with a fresh process-unique id
    pub fn new(
        alert_type: AlertType,
        severity: Severity,
        message: impl Into<String>,
        data: serde_json::Value,
        timestamp: Timestamp,
    ) -> Self {
        let sequence = ALERT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("{}-{}-{}", alert_type, timestamp.timestamp_millis(), sequence),
            alert_type,
            message: message.into(),
            timestamp,
            severity,
            data,
        }
    }

    /// Create an `info` alert for a monitoring lifecycle event
    pub fn lifecycle(message: impl Into<String>, timestamp: Timestamp) -> Self {
        Self::new(
            AlertType::Info,
            Severity::Info,
            message,
            serde_json::Value::Null,
            timestamp,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_classify_derives_fields() {
        let raw = RawMention::new("I love this, great quality", Platform::Reddit);
        let mention = Mention::classify(raw).unwrap();

        assert_eq!(mention.sentiment(), Sentiment::Positive);
        assert!(mention.sentiment_score() > SENTIMENT_THRESHOLD);
        assert_eq!(mention.topic(), Topic::ProductQuality);
        assert_eq!(mention.platform(), Platform::Reddit);
        assert!(!mention.id().is_empty());
    }

    #[test]
    fn test_classify_rejects_empty_text() {
        let raw = RawMention::new("   ", Platform::Twitter);
        assert!(matches!(
            Mention::classify(raw),
            Err(SourceError::InvalidMention(_))
        ));
    }

    #[test]
    fn test_classify_keeps_source_id_and_timestamp() {
        let ts = Utc::now() - Duration::minutes(3);
        let mut raw = RawMention::new("Saw this at the store today", Platform::Forums).at(ts);
        raw.id = Some("feed-42".to_string());

        let mention = Mention::classify(raw).unwrap();
        assert_eq!(mention.id(), "feed-42");
        assert_eq!(mention.timestamp(), ts);
    }

    #[test]
    fn test_generate_mention_id_format() {
        let mut rng = StdRng::seed_from_u64(7);
        let ts = Utc::now();
        let id = generate_mention_id(ts, &mut rng);

        let (millis, suffix) = id.split_once('-').unwrap();
        assert_eq!(millis, ts.timestamp_millis().to_string());
        assert_eq!(suffix.len(), 9);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_sentiment_from_score_threshold() {
        assert_eq!(Sentiment::from_score(0.2), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(0.21), Sentiment::Positive);
        assert_eq!(Sentiment::from_score(-0.2), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(-0.34), Sentiment::Negative);
    }

    #[test]
    fn test_alert_ids_are_unique() {
        let now = Utc::now();
        let a = Alert::lifecycle("Monitoring started", now);
        let b = Alert::lifecycle("Monitoring started", now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_alert_serialization() {
        let alert = Alert::new(
            AlertType::PlatformSpike,
            Severity::Medium,
            "Unusual activity on Reddit",
            serde_json::json!({ "platform": "Reddit", "count": 7 }),
            Utc::now(),
        );

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "platform_spike");
        assert_eq!(json["severity"], "medium");
        assert_eq!(json["data"]["count"], 7);

        let back: Alert = serde_json::from_value(json).unwrap();
        assert_eq!(back, alert);
    }

    #[test]
    fn test_topic_serialization_uses_labels() {
        assert_eq!(
            serde_json::to_string(&Topic::BrandImage).unwrap(),
            "\"Brand Image\""
        );
        assert_eq!(
            serde_json::to_string(&Sentiment::Negative).unwrap(),
            "\"negative\""
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }
}
