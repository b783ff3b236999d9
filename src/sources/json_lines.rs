use crate::error::SourceError;
use crate::events::{Mention, RawMention};
use crate::sources::MentionSource;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Feed adapter reading one JSON `RawMention` per line
///
/// Blank lines are skipped. A malformed line fails only that draw, so the
/// next call continues with the following line.
pub struct JsonLinesSource<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a newline-delimited JSON file
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }
}

impl<R: BufRead + Send> MentionSource for JsonLinesSource<R> {
    fn next_mention(&mut self) -> Result<Mention, SourceError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Err(SourceError::Exhausted);
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() {
                continue;
            }

            debug!("Parsing feed line {}", self.line_number);
            let raw: RawMention = serde_json::from_str(trimmed).map_err(|e| {
                SourceError::Parse(format!("line {}: {}", self.line_number, e))
            })?;
            return Mention::classify(raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{Platform, Sentiment};
    use std::io::{Cursor, Write};
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_and_classifies_lines() {
        let data = concat!(
            r#"{"id":"a1","text":"Worst customer experience ever","platform":"Reddit","author":"ann","reach":120,"engagement":15}"#,
            "\n\n",
            r#"{"text":"I love this","platform":"LinkedIn"}"#,
            "\n"
        );
        let mut source = JsonLinesSource::new(Cursor::new(data));

        let first = source.next_mention().unwrap();
        assert_eq!(first.id(), "a1");
        assert_eq!(first.platform(), Platform::Reddit);
        assert_eq!(first.sentiment(), Sentiment::Negative);
        assert_eq!(first.reach(), 120);

        let second = source.next_mention().unwrap();
        assert_eq!(second.sentiment(), Sentiment::Positive);
        assert_eq!(second.author(), "");

        assert!(matches!(source.next_mention(), Err(SourceError::Exhausted)));
    }

    #[test]
    fn test_malformed_line_fails_one_draw_only() {
        let data = "not json\n{\"text\":\"Great experience\",\"platform\":\"News\"}\n";
        let mut source = JsonLinesSource::new(Cursor::new(data));

        match source.next_mention() {
            Err(SourceError::Parse(msg)) => assert!(msg.starts_with("line 1")),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert_eq!(source.next_mention().unwrap().platform(), Platform::News);
    }

    #[test]
    fn test_unknown_platform_is_parse_error() {
        let data = "{\"text\":\"hello\",\"platform\":\"Myspace\"}\n";
        let mut source = JsonLinesSource::new(Cursor::new(data));
        assert!(matches!(source.next_mention(), Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_empty_text_is_invalid() {
        let data = "{\"text\":\"\",\"platform\":\"Blogs\"}\n";
        let mut source = JsonLinesSource::new(Cursor::new(data));
        assert!(matches!(
            source.next_mention(),
            Err(SourceError::InvalidMention(_))
        ));
    }

    #[test]
    fn test_open_file_and_initial_batch() {
        let mut file = NamedTempFile::new().unwrap();
        for i in 0..3 {
            writeln!(
                file,
                r#"{{"id":"m{}","text":"Saw this at the store today","platform":"Forums"}}"#,
                i
            )
            .unwrap();
        }
        file.flush().unwrap();

        let mut source = JsonLinesSource::open(file.path()).unwrap();
        let batch = source.initial_batch(20);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch[2].id(), "m2");
    }

    #[test]
    fn test_open_missing_file() {
        let result = JsonLinesSource::open(Path::new("/nonexistent/feed.jsonl"));
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
