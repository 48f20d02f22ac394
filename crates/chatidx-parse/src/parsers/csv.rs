//! CSV transcript parser.

use super::TranscriptParser;
use crate::error::ParseResult;
use chatidx_core::Message;
use csv::ReaderBuilder;
use std::path::Path;
use tracing::warn;

/// Parser for CSV exports. Reads the `message` column, or `content` when
/// no `message` column exists; empty cells are skipped.
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for CsvParser {
    fn parse(&self, path: &Path, content: &str) -> ParseResult<Vec<Message>> {
        let mut reader = ReaderBuilder::new().from_reader(content.as_bytes());
        let headers = reader.headers()?.clone();

        let column = headers
            .iter()
            .position(|h| h == "message")
            .or_else(|| headers.iter().position(|h| h == "content"));

        let column = match column {
            Some(idx) => idx,
            None => {
                warn!(
                    "No 'message' or 'content' column in {}",
                    path.display()
                );
                return Ok(Vec::new());
            }
        };

        let mut messages = Vec::new();
        for result in reader.records() {
            let record = result?;
            if let Some(value) = record.get(column) {
                if !value.is_empty() {
                    messages.push(value.to_string());
                }
            }
        }

        Ok(messages)
    }

    fn extensions(&self) -> &[&str] {
        &[".csv"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_message_column() {
        let parser = CsvParser::new();
        let path = PathBuf::from("chat.csv");
        let content = "timestamp,message\n2023-01-01,Hello\n2023-01-02,Hi there\n";

        let messages = parser.parse(&path, content).unwrap();
        assert_eq!(messages, vec!["Hello", "Hi there"]);
    }

    #[test]
    fn test_content_column_fallback() {
        let parser = CsvParser::new();
        let path = PathBuf::from("chat.csv");
        let content = "content,author\nfirst,me\nsecond,you\n";

        let messages = parser.parse(&path, content).unwrap();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_message_column_wins_over_content() {
        let parser = CsvParser::new();
        let path = PathBuf::from("chat.csv");
        let content = "content,message\nignored,kept\n";

        let messages = parser.parse(&path, content).unwrap();
        assert_eq!(messages, vec!["kept"]);
    }

    #[test]
    fn test_missing_column() {
        let parser = CsvParser::new();
        let path = PathBuf::from("chat.csv");
        let content = "a,b\n1,2\n";

        let messages = parser.parse(&path, content).unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_empty_cells_skipped() {
        let parser = CsvParser::new();
        let path = PathBuf::from("chat.csv");
        let content = "message\nfirst\n\"\"\nsecond\n";

        let messages = parser.parse(&path, content).unwrap();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn test_quoted_commas() {
        let parser = CsvParser::new();
        let path = PathBuf::from("chat.csv");
        let content = "message\n\"Hello, world\"\n";

        let messages = parser.parse(&path, content).unwrap();
        assert_eq!(messages, vec!["Hello, world"]);
    }
}
