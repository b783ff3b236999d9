/// Synthetic mention generator
pub mod synthetic;

/// Newline-delimited JSON feed adapter
pub mod json_lines;

pub use json_lines::JsonLinesSource;
pub use synthetic::SyntheticSource;

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::events::Mention;
use log::{info, warn};

/// Producer of classified mentions
///
/// A draw may fail; the monitoring controller treats a failed draw as a
/// skipped tick and leaves its state untouched.
#[cfg_attr(test, mockall::automock)]
pub trait MentionSource: Send {
    /// Produce the next mention
    fn next_mention(&mut self) -> Result<Mention, SourceError>;

    /// Produce up to `count` mentions to seed a window before streaming starts
    ///
    /// Failed draws are logged and skipped, so fewer than `count` mentions may
    /// be returned by sources that can fail or run dry.
    fn initial_batch(&mut self, count: usize) -> Vec<Mention> {
        let mut batch = Vec::with_capacity(count);
        for _ in 0..count {
            match self.next_mention() {
                Ok(mention) => batch.push(mention),
                Err(SourceError::Exhausted) => break,
                Err(e) => warn!("Skipping mention in initial batch: {}", e),
            }
        }
        batch
    }
}

/// Build the source described by the configuration
///
/// # Arguments
///
/// * `config` - Source section of the configuration
/// * `history_spacing` - Spacing used to backdate a synthetic initial batch
///
/// # Errors
///
/// Returns `SourceError::Io` if a JSON lines feed cannot be opened
pub fn from_config(
    config: &SourceConfig,
    history_spacing: chrono::Duration,
) -> Result<Box<dyn MentionSource>, SourceError> {
    match config {
        SourceConfig::Synthetic { seed } => {
            let source = match seed {
                Some(seed) => {
                    info!("Using synthetic source with seed {}", seed);
                    SyntheticSource::with_seed(*seed)
                }
                None => {
                    info!("Using synthetic source");
                    SyntheticSource::new()
                }
            };
            Ok(Box::new(source.with_history_spacing(history_spacing)))
        }
        SourceConfig::JsonLines { path } => {
            info!("Reading mentions from {}", path.display());
            Ok(Box::new(JsonLinesSource::open(path)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_config_synthetic() {
        let config = SourceConfig::Synthetic { seed: Some(4) };
        let mut source = from_config(&config, chrono::Duration::seconds(1)).unwrap();
        assert!(source.next_mention().is_ok());
    }

    #[test]
    fn test_from_config_json_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"text": "Great product", "platform": "Reddit"}}"#).unwrap();

        let config = SourceConfig::JsonLines {
            path: file.path().to_path_buf(),
        };
        let mut source = from_config(&config, chrono::Duration::seconds(1)).unwrap();
        assert_eq!(source.next_mention().unwrap().text(), "Great product");
        assert!(matches!(source.next_mention(), Err(SourceError::Exhausted)));
    }

    #[test]
    fn test_from_config_missing_file() {
        let config = SourceConfig::JsonLines {
            path: "/nonexistent/mentions.jsonl".into(),
        };
        assert!(matches!(
            from_config(&config, chrono::Duration::seconds(1)),
            Err(SourceError::Io(_))
        ));
    }
}
