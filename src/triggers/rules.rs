//! Built-in anomaly rules
//!
//! Every rule reads the newest-first window and produces at most one
//! candidate alert. Rules that need a minimum window length stay silent
//! on shorter windows.

use crate::events::{Alert, AlertType, Mention, Sentiment, Severity, Timestamp};
use crate::triggers::DetectionRule;
use chrono::Duration;
use serde_json::json;

/// Size of the "recent" slice used by the volume, sentiment and platform rules
const RECENT_SLICE: usize = 10;

/// Size of the slice used by the topic rule
const TOPIC_SLICE: usize = 15;

/// Count occurrences of each key, keeping first-seen order
fn tally<K: PartialEq + Copy>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: Vec<(K, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(seen, _)| *seen == key) {
            Some((_, count)) => *count += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

fn percent(count: usize, of: usize) -> f64 {
    (count * 100) as f64 / of as f64
}

/// Rule that fires when the newest mentions arrive much faster than the ones before
///
/// The ten newest mentions are counted if they fall inside the latest bucket
/// of time; the next ten are counted if they fall inside the bucket before it.
/// Each rate is count / 10. The rule fires when the recent rate is more than
/// twice the older rate and above 0.5.
pub struct VolumeSpikeRule {
    /// Width of each time bucket
    pub bucket: Duration,
}

impl VolumeSpikeRule {
    /// Minimum window length the rule needs
    pub const MIN_WINDOW: usize = 2 * RECENT_SLICE;

    pub fn new(bucket: Duration) -> Self {
        Self { bucket }
    }

    /// Ten ticks of 2.5 seconds per bucket
    pub fn with_defaults() -> Self {
        Self::new(Duration::seconds(25))
    }
}

impl DetectionRule for VolumeSpikeRule {
    fn evaluate(&self, mentions: &[Mention], now: Timestamp) -> Option<Alert> {
        if mentions.len() < Self::MIN_WINDOW {
            return None;
        }

        let recent_cutoff = now - self.bucket;
        let older_cutoff = recent_cutoff - self.bucket;

        let recent_count = mentions[..RECENT_SLICE]
            .iter()
            .filter(|m| m.timestamp() >= recent_cutoff)
            .count();
        let older_count = mentions[RECENT_SLICE..Self::MIN_WINDOW]
            .iter()
            .filter(|m| m.timestamp() >= older_cutoff && m.timestamp() < recent_cutoff)
            .count();

        // rate > 0.5 means more than five of ten
        if recent_count <= 2 * older_count || recent_count * 2 <= RECENT_SLICE {
            return None;
        }

        let recent_rate = recent_count as f64 / RECENT_SLICE as f64;
        let older_rate = older_count as f64 / RECENT_SLICE as f64;
        // an empty older bucket is treated as one mention so the ratio stays finite
        let baseline = older_count.max(1) as f64;
        let percent_increase = ((recent_count as f64 / baseline - 1.0) * 100.0).round() as i64;

        let severity = if percent_increase > 150 {
            Severity::Critical
        } else {
            Severity::High
        };

        Some(Alert::new(
            AlertType::VolumeSpike,
            severity,
            format!(
                "Volume spike detected: {}% increase in mentions",
                percent_increase
            ),
            json!({
                "recentRate": recent_rate,
                "olderRate": older_rate,
                "percentIncrease": percent_increase,
            }),
            now,
        ))
    }

    fn name(&self) -> &str {
        "VolumeSpikeRule"
    }

    fn alert_type(&self) -> AlertType {
        AlertType::VolumeSpike
    }
}

/// Rule that fires when too many of the newest mentions are negative
pub struct NegativeSentimentRule {
    /// Negative share (percent) that must be exceeded to fire
    pub threshold_pct: f64,
    /// Negative share (percent) above which the alert is critical
    pub critical_pct: f64,
}

impl NegativeSentimentRule {
    pub const MIN_WINDOW: usize = RECENT_SLICE;

    pub fn new(threshold_pct: f64) -> Self {
        Self {
            threshold_pct,
            critical_pct: 60.0,
        }
    }

    /// Fire above 40% negative, critical above 60%
    pub fn with_defaults() -> Self {
        Self::new(40.0)
    }
}

impl DetectionRule for NegativeSentimentRule {
    fn evaluate(&self, mentions: &[Mention], now: Timestamp) -> Option<Alert> {
        if mentions.len() < Self::MIN_WINDOW {
            return None;
        }

        let negative_count = mentions[..RECENT_SLICE]
            .iter()
            .filter(|m| m.sentiment() == Sentiment::Negative)
            .count();
        let negative_pct = percent(negative_count, RECENT_SLICE);

        if negative_pct <= self.threshold_pct {
            return None;
        }

        let severity = if negative_pct > self.critical_pct {
            Severity::Critical
        } else {
            Severity::High
        };

        Some(Alert::new(
            AlertType::NegativeSentiment,
            severity,
            format!(
                "Negative sentiment surge: {:.0}% of recent mentions are negative",
                negative_pct
            ),
            json!({
                "negativeCount": negative_count,
                "totalCount": RECENT_SLICE,
                "percentage": negative_pct,
            }),
            now,
        ))
    }

    fn name(&self) -> &str {
        "NegativeSentimentRule"
    }

    fn alert_type(&self) -> AlertType {
        AlertType::NegativeSentiment
    }
}

/// Rule that fires when one platform dominates the newest mentions
pub struct PlatformSpikeRule {
    /// Platform share (percent) that must be exceeded to fire
    pub threshold_pct: f64,
    /// Count that must be exceeded to fire
    pub min_count: usize,
}

impl PlatformSpikeRule {
    pub const MIN_WINDOW: usize = 2 * RECENT_SLICE;

    pub fn new(threshold_pct: f64) -> Self {
        Self {
            threshold_pct,
            min_count: 5,
        }
    }

    /// Fire above 50% share with more than five mentions
    pub fn with_defaults() -> Self {
        Self::new(50.0)
    }
}

impl DetectionRule for PlatformSpikeRule {
    fn evaluate(&self, mentions: &[Mention], now: Timestamp) -> Option<Alert> {
        if mentions.len() < Self::MIN_WINDOW {
            return None;
        }

        let counts = tally(mentions[..RECENT_SLICE].iter().map(|m| m.platform()));
        let (platform, count) = counts.into_iter().find(|(_, count)| {
            percent(*count, RECENT_SLICE) > self.threshold_pct && *count > self.min_count
        })?;
        let share = percent(count, RECENT_SLICE);

        Some(Alert::new(
            AlertType::PlatformSpike,
            Severity::Medium,
            format!(
                "Unusual activity on {}: {:.0}% of recent mentions",
                platform, share
            ),
            json!({
                "platform": platform,
                "count": count,
                "percentage": share,
            }),
            now,
        ))
    }

    fn name(&self) -> &str {
        "PlatformSpikeRule"
    }

    fn alert_type(&self) -> AlertType {
        AlertType::PlatformSpike
    }
}

/// Rule that fires when one topic dominates the newest fifteen mentions
pub struct TopicTrendRule {
    /// Topic share (percent) that must be exceeded to fire
    pub threshold_pct: f64,
    /// Count that must be exceeded to fire
    pub min_count: usize,
}

impl TopicTrendRule {
    pub const MIN_WINDOW: usize = TOPIC_SLICE;

    pub fn new(threshold_pct: f64) -> Self {
        Self {
            threshold_pct,
            min_count: 6,
        }
    }

    /// Fire above 40% share with more than six mentions
    pub fn with_defaults() -> Self {
        Self::new(40.0)
    }
}

impl DetectionRule for TopicTrendRule {
    fn evaluate(&self, mentions: &[Mention], now: Timestamp) -> Option<Alert> {
        if mentions.len() < Self::MIN_WINDOW {
            return None;
        }

        let mut leader = None;
        for (topic, count) in tally(mentions[..TOPIC_SLICE].iter().map(|m| m.topic())) {
            match leader {
                Some((_, best)) if count <= best => {}
                _ => leader = Some((topic, count)),
            }
        }
        let (topic, count) = leader?;
        let share = percent(count, TOPIC_SLICE);

        if share <= self.threshold_pct || count <= self.min_count {
            return None;
        }

        Some(Alert::new(
            AlertType::TopicTrend,
            Severity::Medium,
            format!(
                "Trending topic: \"{}\" in {:.0}% of recent mentions",
                topic, share
            ),
            json!({
                "topic": topic,
                "count": count,
                "percentage": share,
            }),
            now,
        ))
    }

    fn name(&self) -> &str {
        "TopicTrendRule"
    }

    fn alert_type(&self) -> AlertType {
        AlertType::TopicTrend
    }
}
