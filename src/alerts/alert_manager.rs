use crate::events::Alert;
use chrono::Duration;
use log::{debug, info};
use std::collections::VecDeque;

/// Default number of alerts retained
pub const DEFAULT_ALERT_CAPACITY: usize = 10;

/// Default same-type deduplication window in seconds
pub const DEFAULT_DEDUP_SECONDS: i64 = 30;

/// Owns the alert lifecycle
///
/// Candidates from the detector and lifecycle events are admitted through a
/// per-type deduplication check, then kept newest-first in a bounded list.
/// Dismissal removes an alert immediately regardless of its position.
#[derive(Debug, Clone)]
pub struct AlertManager {
    /// Retained alerts, newest first
    alerts: VecDeque<Alert>,
    /// Maximum number of retained alerts
    capacity: usize,
    /// Same-type candidates closer than this to a retained alert are dropped
    dedup_window: Duration,
}

impl Default for AlertManager {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_CAPACITY, Duration::seconds(DEFAULT_DEDUP_SECONDS))
    }
}

impl AlertManager {
    /// Create an alert manager
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of alerts to retain
    /// * `dedup_window` - Minimum spacing between retained alerts of the same type
    pub fn new(capacity: usize, dedup_window: Duration) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity + 1),
            capacity,
            dedup_window,
        }
    }

    /// Admit a candidate alert
    ///
    /// The candidate is silently dropped when a retained alert of the same type
    /// is less than the dedup window older than it. Otherwise it becomes the
    /// newest alert and the oldest alerts beyond capacity are discarded.
    ///
    /// # Returns
    ///
    /// `true` if the candidate was admitted, `false` if it was a duplicate
    pub fn admit(&mut self, candidate: Alert) -> bool {
        if self.is_duplicate(&candidate) {
            debug!(
                "Dropping duplicate {} alert: {}",
                candidate.alert_type, candidate.message
            );
            return false;
        }

        info!(
            "Alert [{}] {}: {}",
            candidate.severity, candidate.alert_type, candidate.message
        );
        self.alerts.push_front(candidate);

        while self.alerts.len() > self.capacity {
            if let Some(dropped) = self.alerts.pop_back() {
                debug!("Alert list full, discarding oldest alert: {}", dropped.id);
            }
        }
        true
    }

    /// Remove the alert with `alert_id`
    ///
    /// Unknown ids are ignored.
    ///
    /// # Returns
    ///
    /// `true` if an alert was removed
    pub fn dismiss(&mut self, alert_id: &str) -> bool {
        match self.alerts.iter().position(|alert| alert.id == alert_id) {
            Some(index) => {
                self.alerts.remove(index);
                info!("Dismissed alert {}", alert_id);
                true
            }
            None => {
                debug!("Ignoring dismissal of unknown alert {}", alert_id);
                false
            }
        }
    }

    /// Owned newest-first copy of the retained alerts
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    fn is_duplicate(&self, candidate: &Alert) -> bool {
        self.alerts.iter().any(|existing| {
            existing.alert_type == candidate.alert_type
                && candidate.timestamp - existing.timestamp < self.dedup_window
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{AlertType, Severity, Timestamp};
    use chrono::Utc;

    fn candidate(alert_type: AlertType, timestamp: Timestamp) -> Alert {
        Alert::new(
            alert_type,
            Severity::High,
            format!("{} candidate", alert_type),
            serde_json::Value::Null,
            timestamp,
        )
    }

    #[test]
    fn test_alert_manager_creation() {
        let manager = AlertManager::default();
        assert!(manager.is_empty());
        assert_eq!(manager.capacity, DEFAULT_ALERT_CAPACITY);
        assert_eq!(manager.dedup_window, Duration::seconds(30));
    }

    #[test]
    fn test_same_type_within_window_is_dropped() {
        let mut manager = AlertManager::default();
        let now = Utc::now();

        assert!(manager.admit(candidate(AlertType::VolumeSpike, now)));
        assert!(!manager.admit(candidate(AlertType::VolumeSpike, now + Duration::seconds(29))));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_same_type_outside_window_is_admitted() {
        let mut manager = AlertManager::default();
        let now = Utc::now();

        assert!(manager.admit(candidate(AlertType::VolumeSpike, now)));
        assert!(manager.admit(candidate(AlertType::VolumeSpike, now + Duration::seconds(31))));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_dedup_is_per_type() {
        let mut manager = AlertManager::default();
        let now = Utc::now();

        assert!(manager.admit(candidate(AlertType::VolumeSpike, now)));
        assert!(manager.admit(candidate(AlertType::NegativeSentiment, now)));
        assert!(manager.admit(candidate(AlertType::PlatformSpike, now)));
        assert!(manager.admit(candidate(AlertType::TopicTrend, now)));
        assert_eq!(manager.len(), 4);
    }

    #[test]
    fn test_newest_first_and_capacity() {
        let mut manager = AlertManager::new(3, Duration::seconds(30));
        let start = Utc::now();

        for i in 0..5 {
            manager.admit(candidate(AlertType::TopicTrend, start + Duration::minutes(i)));
        }

        let alerts = manager.alerts();
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].timestamp, start + Duration::minutes(4));
        assert_eq!(alerts[2].timestamp, start + Duration::minutes(2));
    }

    #[test]
    fn test_dismiss_any_position() {
        let mut manager = AlertManager::default();
        let now = Utc::now();
        manager.admit(candidate(AlertType::VolumeSpike, now));
        manager.admit(candidate(AlertType::TopicTrend, now));
        manager.admit(candidate(AlertType::PlatformSpike, now));

        let middle = manager.alerts()[1].id.clone();
        assert!(manager.dismiss(&middle));
        assert_eq!(manager.len(), 2);
        assert!(manager.alerts().iter().all(|a| a.id != middle));
    }

    #[test]
    fn test_dismiss_unknown_is_noop() {
        let mut manager = AlertManager::default();
        manager.admit(candidate(AlertType::VolumeSpike, Utc::now()));
        assert!(!manager.dismiss("no-such-alert"));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_dismissed_type_can_alert_again() {
        let mut manager = AlertManager::default();
        let now = Utc::now();
        manager.admit(candidate(AlertType::NegativeSentiment, now));
        let id = manager.alerts()[0].id.clone();
        manager.dismiss(&id);

        assert!(manager.admit(candidate(AlertType::NegativeSentiment, now + Duration::seconds(1))));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::events::{AlertType, Severity};
    use chrono::Utc;
    use quickcheck_macros::quickcheck;

    fn alert_type(index: u8) -> AlertType {
        match index % 5 {
            0 => AlertType::VolumeSpike,
            1 => AlertType::NegativeSentiment,
            2 => AlertType::PlatformSpike,
            3 => AlertType::TopicTrend,
            _ => AlertType::Info,
        }
    }

    #[quickcheck]
    fn prop_capacity_and_spacing_hold(steps: Vec<(u8, u8)>) -> bool {
        let mut manager = AlertManager::default();
        let mut now = Utc::now();

        for (kind, gap) in steps {
            now += Duration::seconds(gap as i64 % 40);
            manager.admit(Alert::new(
                alert_type(kind),
                Severity::Medium,
                "candidate",
                serde_json::Value::Null,
                now,
            ));
        }

        let alerts = manager.alerts();
        let within_capacity = alerts.len() <= DEFAULT_ALERT_CAPACITY;
        // retained alerts of one type are at least the dedup window apart
        let spaced = alerts.iter().enumerate().all(|(i, newer)| {
            alerts[i + 1..]
                .iter()
                .filter(|older| older.alert_type == newer.alert_type)
                .all(|older| newer.timestamp - older.timestamp >= Duration::seconds(30))
        });
        let newest_first = alerts.windows(2).all(|w| w[0].timestamp >= w[1].timestamp);

        within_capacity && spaced && newest_first
    }
}
