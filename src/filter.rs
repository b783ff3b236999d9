use crate::events::{Mention, Platform, Sentiment};

/// Read-side narrowing of the mention window
///
/// The search term matches case-insensitively against text, topic label,
/// platform name and author. An empty or blank term matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MentionFilter {
    search: Option<String>,
    sentiment: Option<Sentiment>,
    platform: Option<Platform>,
}

impl MentionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_lowercase();
        self.search = if term.is_empty() { None } else { Some(term) };
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Whether no criteria are set
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.sentiment.is_none() && self.platform.is_none()
    }

    pub fn matches(&self, mention: &Mention) -> bool {
        if self.sentiment.is_some_and(|s| s != mention.sentiment()) {
            return false;
        }
        if self.platform.is_some_and(|p| p != mention.platform()) {
            return false;
        }
        match &self.search {
            Some(term) => [
                mention.text(),
                mention.topic().as_str(),
                mention.platform().as_str(),
                mention.author(),
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(term.as_str())),
            None => true,
        }
    }

    /// Matching mentions, order preserved
    pub fn apply(&self, mentions: &[Mention]) -> Vec<Mention> {
        mentions
            .iter()
            .filter(|mention| self.matches(mention))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RawMention;

    fn mention(text: &str, platform: Platform, author: &str) -> Mention {
        let mut raw = RawMention::new(text, platform);
        raw.author = author.to_string();
        Mention::classify(raw).unwrap()
    }

    fn sample() -> Vec<Mention> {
        vec![
            mention("Superb quality and fast delivery", Platform::Twitter, "user1"),
            mention("Customer service was terrible", Platform::Reddit, "user22"),
            mention("Saw this at the store today", Platform::News, "shopper"),
        ]
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = MentionFilter::new().with_search("   ");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&sample()).len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filtered = MentionFilter::new().with_search("SUPERB").apply(&sample());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].platform(), Platform::Twitter);
    }

    #[test]
    fn test_search_covers_topic_platform_and_author() {
        let mentions = sample();
        assert_eq!(MentionFilter::new().with_search("customer service").apply(&mentions).len(), 1);
        assert_eq!(MentionFilter::new().with_search("reddit").apply(&mentions).len(), 1);
        assert_eq!(MentionFilter::new().with_search("shopper").apply(&mentions).len(), 1);
        assert_eq!(MentionFilter::new().with_search("brand image").apply(&mentions).len(), 1);
    }

    #[test]
    fn test_sentiment_and_platform_combine() {
        let mentions = sample();
        let negative = MentionFilter::new()
            .with_sentiment(Sentiment::Negative)
            .apply(&mentions);
        assert_eq!(negative.len(), 1);

        let none = MentionFilter::new()
            .with_sentiment(Sentiment::Negative)
            .with_platform(Platform::Twitter)
            .apply(&mentions);
        assert!(none.is_empty());
    }

    #[test]
    fn test_apply_preserves_order() {
        let mentions = sample();
        let filtered = MentionFilter::new().with_search("user").apply(&mentions);
        assert_eq!(filtered, vec![mentions[0].clone(), mentions[1].clone()]);
    }
}
