/// Bounded newest-first mention buffer
pub mod mention_window;

/// Statistics recomputed from the window
pub mod stats;

pub use mention_window::MentionWindow;
pub use stats::{platform_distribution, recompute_stats, topic_distribution, StatsSnapshot};
