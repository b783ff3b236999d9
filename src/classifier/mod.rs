//! Text classification for mentions
//!
//! Both classifiers are pure lexicon matchers over immutable keyword tables
//! compiled once on first use. Matching is whole-word and case-insensitive.

pub mod sentiment;
pub mod topic;

pub use sentiment::classify_sentiment;
pub use topic::{classify_topic, topic_scores};

use regex::Regex;

/// Compile one whole-word, case-insensitive pattern per lexicon entry
pub(crate) fn compile_lexicon(words: &[&str]) -> Vec<Regex> {
    words
        .iter()
        .map(|word| {
            Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
                .expect("escaped lexicon word is a valid pattern")
        })
        .collect()
}

/// Total number of whole-word hits of every pattern in `text`
pub(crate) fn count_matches(patterns: &[Regex], text: &str) -> usize {
    patterns
        .iter()
        .map(|pattern| pattern.find_iter(text).count())
        .sum()
}
