//! Bounded mention window
//!
//! Stores the most recent mentions newest-first. Inserting into a full window
//! evicts the oldest mention.

use crate::events::Mention;
use std::collections::VecDeque;

/// Default number of mentions retained
pub const DEFAULT_WINDOW_CAPACITY: usize = 200;

/// Newest-first buffer with FIFO eviction on overflow
#[derive(Debug, Clone)]
pub struct MentionWindow {
    mentions: VecDeque<Mention>,
    capacity: usize,
}

impl Default for MentionWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

impl MentionWindow {
    /// Create an empty window holding at most `capacity` mentions
    ///
    /// # Examples
    ///
    /// ```
    /// use mention_watch::aggregator::MentionWindow;
    ///
    /// let window = MentionWindow::new(200);
    /// assert!(window.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        Self {
            mentions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert a mention as the newest entry
    ///
    /// Returns the evicted oldest mention when the window was full.
    pub fn push(&mut self, mention: Mention) -> Option<Mention> {
        self.mentions.push_front(mention);
        if self.mentions.len() > self.capacity {
            self.mentions.pop_back()
        } else {
            None
        }
    }

    /// Insert a batch in arrival order, so the last element ends up newest
    pub fn extend<I: IntoIterator<Item = Mention>>(&mut self, mentions: I) {
        for mention in mentions {
            self.push(mention);
        }
    }

    /// Remove every mention, keeping the capacity
    pub fn clear(&mut self) {
        self.mentions.clear();
    }

    /// Contiguous newest-first view for the aggregator and detector
    pub fn as_slice(&mut self) -> &[Mention] {
        self.mentions.make_contiguous()
    }

    /// Owned newest-first copy for external readers
    pub fn to_vec(&self) -> Vec<Mention> {
        self.mentions.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mention> {
        self.mentions.iter()
    }

    pub fn newest(&self) -> Option<&Mention> {
        self.mentions.front()
    }

    pub fn len(&self) -> usize {
        self.mentions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
