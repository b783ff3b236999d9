//! Synthetic mention generator
//!
//! Draws a template sentence from a weighted category, then lets the classifier
//! derive the mention's sentiment and topic from the chosen text. The drawn
//! category and the computed label are allowed to disagree.

use crate::error::SourceError;
use crate::events::{generate_mention_id, Mention, Platform, RawMention, Sentiment, Timestamp};
use crate::sources::MentionSource;
use chrono::{Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Cumulative category thresholds: 45% positive, 30% neutral, 25% negative
const POSITIVE_CUTOFF: f64 = 0.45;
const NEUTRAL_CUTOFF: f64 = 0.75;

const POSITIVE_TEMPLATES: &[&str] = &[
    "Absolutely love this brand! Best purchase I ever made",
    "Outstanding customer service, highly recommend to everyone",
    "The quality is exceptional, worth every single penny",
    "This company really cares about their customers",
    "Impressive innovation, definitely ahead of the competition",
    "Great experience from start to finish",
    "The product exceeded all my expectations",
    "Fantastic features and excellent build quality",
    "Best customer support team I have ever dealt with",
    "Amazing value for money, could not be happier",
    "Wonderful product, will definitely buy again",
    "Perfect solution to my problem, thank you",
    "Superb quality and fast delivery",
    "Brilliant design and functionality",
    "Very pleased with my purchase",
];

const NEUTRAL_TEMPLATES: &[&str] = &[
    "Just bought this product, will update later with review",
    "Saw an advertisement for this brand today",
    "Currently comparing this with other available options",
    "Does anyone have experience with this company?",
    "New product launch was just announced",
    "Looking at different brands before making decision",
    "Considering purchasing this next month",
    "Read some reviews, still undecided",
    "Checking out their website right now",
    "Heard about this brand from a friend",
    "What are people saying about this product?",
    "Trying to decide between this and competitor",
    "Anyone used this before? Need opinions",
    "Saw this at the store today",
    "Researching this brand currently",
];

const NEGATIVE_TEMPLATES: &[&str] = &[
    "Very disappointed with the quality, not what I expected",
    "Customer service was terrible, not helpful at all",
    "Completely overpriced for what you actually get",
    "Had a really bad experience, would not recommend",
    "Product broke after just a few days of use",
    "Waste of money, very poor quality",
    "Terrible experience with support team",
    "Failed to meet basic expectations",
    "Frustrated with the lack of features",
    "Awful product, returned it immediately",
    "Very unhappy with this purchase",
    "Disappointing quality and service",
    "Avoid this brand, not worth it",
    "Poor value for the high price",
    "Worst customer experience ever",
];

const LOCATIONS: &[&str] = &[
    "New York, USA",
    "London, UK",
    "Tokyo, Japan",
    "Sydney, Australia",
    "Toronto, Canada",
    "Berlin, Germany",
    "Paris, France",
    "Singapore",
    "Mumbai, India",
    "São Paulo, Brazil",
];

/// Map a uniform roll in [0, 1) to a template category
pub fn draw_category(roll: f64) -> Sentiment {
    if roll < POSITIVE_CUTOFF {
        Sentiment::Positive
    } else if roll < NEUTRAL_CUTOFF {
        Sentiment::Neutral
    } else {
        Sentiment::Negative
    }
}

/// Template pool for a category
pub fn templates(category: Sentiment) -> &'static [&'static str] {
    match category {
        Sentiment::Positive => POSITIVE_TEMPLATES,
        Sentiment::Neutral => NEUTRAL_TEMPLATES,
        Sentiment::Negative => NEGATIVE_TEMPLATES,
    }
}

/// Default spacing between backdated mentions in an initial batch
pub const DEFAULT_HISTORY_SPACING_MS: i64 = 2500;

/// Random mention generator for demos and tests
pub struct SyntheticSource {
    rng: StdRng,
    history_spacing: Duration,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticSource {
    /// Create a generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            history_spacing: Duration::milliseconds(DEFAULT_HISTORY_SPACING_MS),
        }
    }

    /// Create a reproducible generator
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            history_spacing: Duration::milliseconds(DEFAULT_HISTORY_SPACING_MS),
        }
    }

    /// Set how far apart initial-batch mentions are backdated
    pub fn with_history_spacing(mut self, spacing: Duration) -> Self {
        self.history_spacing = spacing;
        self
    }

    /// Generate one mention timestamped now
    pub fn generate(&mut self) -> Result<Mention, SourceError> {
        self.generate_at(Utc::now())
    }

    fn generate_at(&mut self, timestamp: Timestamp) -> Result<Mention, SourceError> {
        let category = draw_category(self.rng.gen::<f64>());
        let text = templates(category)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_default();
        let platform = Platform::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Platform::Twitter);

        let raw = RawMention {
            id: Some(generate_mention_id(timestamp, &mut self.rng)),
            text: text.to_string(),
            platform,
            author: format!("user{}", self.rng.gen_range(0..10_000)),
            reach: self.rng.gen_range(100..50_100),
            engagement: self.rng.gen_range(10..2_010),
            location: LOCATIONS.choose(&mut self.rng).map(|l| l.to_string()),
            timestamp: Some(timestamp),
        };

        Mention::classify(raw)
    }
}

impl MentionSource for SyntheticSource {
    fn next_mention(&mut self) -> Result<Mention, SourceError> {
        self.generate()
    }

    /// Backdate the batch so it reads as a steady stream ending now, oldest first
    fn initial_batch(&mut self, count: usize) -> Vec<Mention> {
        let now = Utc::now();
        (0..count)
            .rev()
            .filter_map(|age| {
                let timestamp = now - self.history_spacing * age as i32;
                self.generate_at(timestamp).ok()
            })
            .collect()
    }
}
