//! Keyword-based topic extraction

use super::{compile_lexicon, count_matches};
use crate::events::Topic;
use regex::Regex;
use std::sync::LazyLock;

/// Keyword table in `Topic::ALL` order
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::ProductQuality,
        &[
            "quality", "product", "build", "made", "durable", "materials", "craftsmanship",
            "workmanship", "defect", "broken", "working",
        ],
    ),
    (
        Topic::CustomerService,
        &[
            "service", "support", "help", "staff", "representative", "agent", "response",
            "helpful", "customer care", "assistance", "team",
        ],
    ),
    (
        Topic::Pricing,
        &[
            "price", "cost", "expensive", "cheap", "affordable", "value", "money", "worth",
            "pricing", "budget", "discount", "sale",
        ],
    ),
    (
        Topic::Features,
        &[
            "feature", "functionality", "capability", "option", "work", "function", "tool",
            "ability", "performance", "specs",
        ],
    ),
    (
        Topic::BrandImage,
        &[
            "brand", "company", "reputation", "trust", "image", "perception", "experience",
            "impression", "feel", "professional",
        ],
    ),
    (
        Topic::Competition,
        &[
            "competition", "competitor", "compare", "versus", "alternative", "better than",
            "worse than", "similar", "different", "vs",
        ],
    ),
    (
        Topic::Innovation,
        &[
            "innovation", "innovative", "new", "modern", "advanced", "technology",
            "cutting edge", "latest", "updated", "upgrade", "future",
        ],
    ),
];

static TOPIC_LEXICONS: LazyLock<Vec<(Topic, Vec<Regex>)>> = LazyLock::new(|| {
    TOPIC_KEYWORDS
        .iter()
        .map(|(topic, words)| (*topic, compile_lexicon(words)))
        .collect()
});

/// Keyword hit count for every topic, in enumeration order
pub fn topic_scores(text: &str) -> Vec<(Topic, usize)> {
    TOPIC_LEXICONS
        .iter()
        .map(|(topic, patterns)| (*topic, count_matches(patterns, text)))
        .collect()
}

/// Pick the topic with the strictly highest keyword count
///
/// Ties keep the earliest topic in enumeration order. Text without any
/// keyword hit falls back to `Topic::FALLBACK`.
pub fn classify_topic(text: &str) -> Topic {
    let mut best = Topic::FALLBACK;
    let mut best_score = 0;

    for (topic, score) in topic_scores(text) {
        if score > best_score {
            best = topic;
            best_score = score;
        }
    }

    best
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn prop_topic_is_always_in_fixed_set(text: String) -> bool {
        Topic::ALL.contains(&classify_topic(&text))
    }

    #[quickcheck]
    fn prop_topic_has_maximal_score(text: String) -> bool {
        let scores = topic_scores(&text);
        let max = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
        let chosen = classify_topic(&text);
        if max == 0 {
            chosen == Topic::FALLBACK
        } else {
            scores
                .iter()
                .find(|(_, s)| *s == max)
                .map(|(t, _)| *t == chosen)
                .unwrap_or(false)
        }
    }
}
