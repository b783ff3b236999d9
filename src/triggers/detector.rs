use crate::config::DetectorConfig;
use crate::events::{Alert, AlertType, Mention, Timestamp};
use crate::triggers::rules::{
    NegativeSentimentRule, PlatformSpikeRule, TopicTrendRule, VolumeSpikeRule,
};
use log::debug;

/// Engine running every anomaly rule over the current window
pub struct AnomalyDetector {
    rules: Vec<Box<dyn DetectionRule>>,
}

/// A single anomaly rule over the newest-first mention window
///
/// Rules are pure and independent: each inspects the window and returns at
/// most one candidate alert per invocation.
pub trait DetectionRule: Send + Sync {
    /// Evaluate the rule, returning a candidate alert if it fires
    fn evaluate(&self, mentions: &[Mention], now: Timestamp) -> Option<Alert>;

    /// Get a human-readable name for this rule
    fn name(&self) -> &str;

    /// Alert type produced when this rule fires
    fn alert_type(&self) -> AlertType;
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyDetector {
    /// Create a detector with no rules
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create a detector with the four built-in rules at default thresholds
    pub fn with_default_rules() -> Self {
        Self::from_config(&DetectorConfig::default())
    }

    /// Create a detector with the four built-in rules using configured thresholds
    pub fn from_config(config: &DetectorConfig) -> Self {
        let mut detector = Self::new();
        detector.add_rule(Box::new(VolumeSpikeRule::new(config.volume_bucket())));
        detector.add_rule(Box::new(NegativeSentimentRule::new(
            config.negative_threshold_pct,
        )));
        detector.add_rule(Box::new(PlatformSpikeRule::new(
            config.platform_threshold_pct,
        )));
        detector.add_rule(Box::new(TopicTrendRule::new(config.topic_threshold_pct)));
        detector
    }

    /// Add a rule to the detector
    pub fn add_rule(&mut self, rule: Box<dyn DetectionRule>) {
        self.rules.push(rule);
    }

    /// Run every rule once and collect all candidates, in rule order
    pub fn evaluate(&self, mentions: &[Mention], now: Timestamp) -> Vec<Alert> {
        let candidates: Vec<Alert> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(mentions, now))
            .collect();

        if !candidates.is_empty() {
            debug!(
                "{} of {} rules fired over {} mentions",
                candidates.len(),
                self.rules.len(),
                mentions.len()
            );
        }
        candidates
    }

    /// Get the number of configured rules
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Names of the configured rules, in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}
