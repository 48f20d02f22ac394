//! Plain text transcript parser.

use super::TranscriptParser;
use crate::error::ParseResult;
use chatidx_core::Message;
use std::path::Path;

/// Parser for plain text files. Each line is one message.
pub struct TextParser;

impl TextParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for TextParser {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult<Vec<Message>> {
        // Blank lines stay in as empty messages so message counts track
        // line counts.
        Ok(content.lines().map(|line| line.to_string()).collect())
    }

    fn extensions(&self) -> &[&str] {
        &[".txt"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_lines() {
        let parser = TextParser::new();
        let path = PathBuf::from("chat.txt");
        let messages = parser
            .parse(&path, "User: Hello\nAssistant: Hi there")
            .unwrap();

        assert_eq!(messages, vec!["User: Hello", "Assistant: Hi there"]);
    }

    #[test]
    fn test_blank_lines_preserved() {
        let parser = TextParser::new();
        let path = PathBuf::from("chat.txt");
        let messages = parser.parse(&path, "first\n\nthird").unwrap();

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], "");
    }

    #[test]
    fn test_empty_content() {
        let parser = TextParser::new();
        let path = PathBuf::from("chat.txt");
        let messages = parser.parse(&path, "").unwrap();
        assert!(messages.is_empty());
    }
}
