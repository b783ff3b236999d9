//! Statistics snapshot recomputed from the mention window

use crate::events::{Mention, Platform, Sentiment, Topic};
use serde::{Deserialize, Serialize};

/// Point-in-time aggregate statistics over the window
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Mean sentiment score, zero for an empty window
    pub avg_sentiment_score: f64,
}

/// Recompute the snapshot from scratch
///
/// Runs in O(window size) and carries no state between calls.
pub fn recompute_stats(mentions: &[Mention]) -> StatsSnapshot {
    let mut stats = StatsSnapshot {
        total: mentions.len(),
        ..StatsSnapshot::default()
    };
    let mut score_sum = 0.0;

    for mention in mentions {
        match mention.sentiment() {
            Sentiment::Positive => stats.positive += 1,
            Sentiment::Negative => stats.negative += 1,
            Sentiment::Neutral => stats.neutral += 1,
        }
        score_sum += mention.sentiment_score();
    }

    if stats.total > 0 {
        stats.avg_sentiment_score = score_sum / stats.total as f64;
    }
    stats
}

/// Mention count per topic, in enumeration order
pub fn topic_distribution(mentions: &[Mention]) -> Vec<(Topic, usize)> {
    Topic::ALL
        .iter()
        .map(|topic| (*topic, mentions.iter().filter(|m| m.topic() == *topic).count()))
        .collect()
}

/// Mention count per platform, in enumeration order
pub fn platform_distribution(mentions: &[Mention]) -> Vec<(Platform, usize)> {
    Platform::ALL
        .iter()
        .map(|platform| {
            (
                *platform,
                mentions.iter().filter(|m| m.platform() == *platform).count(),
            )
        })
        .collect()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::events::RawMention;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn prop_counts_sum_to_total(texts: Vec<String>) -> bool {
        let mentions: Vec<Mention> = texts
            .into_iter()
            .filter_map(|text| Mention::classify(RawMention::new(text, Platform::Blogs)).ok())
            .collect();

        let stats = recompute_stats(&mentions);
        stats.total == mentions.len()
            && stats.positive + stats.negative + stats.neutral == stats.total
            && (-1.0..=1.0).contains(&stats.avg_sentiment_score)
    }
}
