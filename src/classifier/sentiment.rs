//! Lexicon-based sentiment scoring

use super::{compile_lexicon, count_matches};
use crate::events::Sentiment;
use regex::Regex;
use std::sync::LazyLock;

const POSITIVE_WORDS: &[&str] = &[
    "love", "great", "excellent", "amazing", "outstanding", "best", "recommend", "impressive",
    "wonderful", "fantastic", "awesome", "perfect", "superb", "brilliant", "exceptional",
    "incredible", "delighted", "pleased", "satisfied", "happy", "good",
];

const NEGATIVE_WORDS: &[&str] = &[
    "terrible", "disappointed", "bad", "poor", "worst", "avoid", "broke", "overpriced", "awful",
    "horrible", "disgusting", "useless", "waste", "failed", "frustrating", "annoying", "unhappy",
    "dissatisfied", "angry", "hate", "never",
];

/// Lexicon hits needed to saturate the score at +/-1
const NORMALIZATION_DIVISOR: f64 = 3.0;

static POSITIVE_LEXICON: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_lexicon(POSITIVE_WORDS));
static NEGATIVE_LEXICON: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_lexicon(NEGATIVE_WORDS));

/// Classify the sentiment of `text`
///
/// Each whole-word positive hit adds one and each negative hit subtracts one;
/// the raw total is divided by three and clamped to [-1, 1]. Empty text is
/// neutral with a score of zero.
///
/// # Examples
///
/// ```
/// use mention_watch::classifier::classify_sentiment;
/// use mention_watch::events::Sentiment;
///
/// let (label, score) = classify_sentiment("I love this");
/// assert_eq!(label, Sentiment::Positive);
/// assert!((score - 1.0 / 3.0).abs() < 1e-9);
/// ```
pub fn classify_sentiment(text: &str) -> (Sentiment, f64) {
    if text.trim().is_empty() {
        return (Sentiment::Neutral, 0.0);
    }

    let positive = count_matches(&POSITIVE_LEXICON, text) as f64;
    let negative = count_matches(&NEGATIVE_LEXICON, text) as f64;
    let score = ((positive - negative) / NORMALIZATION_DIVISOR).clamp(-1.0, 1.0);

    (Sentiment::from_score(score), score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_positive_word() {
        let (label, score) = classify_sentiment("I love this");
        assert_eq!(label, Sentiment::Positive);
        assert!((score - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_saturates_at_one() {
        let (label, score) = classify_sentiment("great great great great amazing");
        assert_eq!(label, Sentiment::Positive);
        assert_eq!(score, 1.0);
    }

    #[test]
    fn test_negative_text() {
        let (label, score) = classify_sentiment("Terrible experience, the worst");
        assert_eq!(label, Sentiment::Negative);
        assert!((score + 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mixed_text_cancels_out() {
        let (label, score) = classify_sentiment("good product but bad support");
        assert_eq!(label, Sentiment::Neutral);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_empty_text_is_neutral() {
        assert_eq!(classify_sentiment(""), (Sentiment::Neutral, 0.0));
        assert_eq!(classify_sentiment("   \n"), (Sentiment::Neutral, 0.0));
    }

    #[test]
    fn test_word_boundaries() {
        // "goodness" and "bestow" contain lexicon words but are not hits
        assert_eq!(
            classify_sentiment("goodness, they bestow a brandish"),
            (Sentiment::Neutral, 0.0)
        );
    }

    #[test]
    fn test_case_insensitive() {
        let (label, _) = classify_sentiment("AWFUL. Just AWFUL.");
        assert_eq!(label, Sentiment::Negative);
    }

    #[test]
    fn test_weak_positive_template_can_be_neutral() {
        // no lexicon hits even though the sentence reads positive
        let (label, score) = classify_sentiment("This company really cares about their customers");
        assert_eq!(label, Sentiment::Neutral);
        assert_eq!(score, 0.0);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::events::SENTIMENT_THRESHOLD;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn prop_score_is_bounded_and_label_consistent(text: String) -> bool {
        let (label, score) = classify_sentiment(&text);
        let bounded = (-1.0..=1.0).contains(&score);
        let consistent = match label {
            Sentiment::Positive => score > SENTIMENT_THRESHOLD,
            Sentiment::Negative => score < -SENTIMENT_THRESHOLD,
            Sentiment::Neutral => (-SENTIMENT_THRESHOLD..=SENTIMENT_THRESHOLD).contains(&score),
        };
        bounded && consistent
    }

    #[quickcheck]
    fn prop_classification_is_deterministic(text: String) -> bool {
        classify_sentiment(&text) == classify_sentiment(&text)
    }

    #[quickcheck]
    fn prop_appending_positive_word_never_lowers_score(text: String) -> bool {
        let (_, before) = classify_sentiment(&text);
        let (_, after) = classify_sentiment(&format!("{} great", text));
        after >= before
    }
}
