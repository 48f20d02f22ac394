//! JSON transcript parser.

use super::TranscriptParser;
use crate::error::ParseResult;
use chatidx_core::Message;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

/// Parser for JSON transcript exports.
///
/// Two shapes are recognized: a root array of objects carrying a
/// `message` field, and a root object whose `messages` array carries
/// `content` fields. Role metadata is dropped.
pub struct JsonParser;

impl JsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for JsonParser {
    fn parse(&self, path: &Path, content: &str) -> ParseResult<Vec<Message>> {
        let root: Value = serde_json::from_str(content)?;

        let messages = match &root {
            Value::Array(entries) => collect_field(entries, "message"),
            Value::Object(map) => match map.get("messages").and_then(Value::as_array) {
                Some(entries) => collect_field(entries, "content"),
                None => {
                    warn!("JSON structure not recognized in {}", path.display());
                    Vec::new()
                }
            },
            _ => {
                warn!("JSON structure not recognized in {}", path.display());
                Vec::new()
            }
        };

        Ok(messages)
    }

    fn extensions(&self) -> &[&str] {
        &[".json"]
    }
}

/// Pull a named field out of each entry that has one, in order.
fn collect_field(entries: &[Value], field: &str) -> Vec<Message> {
    entries
        .iter()
        .filter_map(|entry| entry.get(field))
        .map(|value| match value.as_str() {
            Some(s) => s.to_string(),
            None => value.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_root_array_with_message_fields() {
        let parser = JsonParser::new();
        let path = PathBuf::from("chat.json");
        let content = r#"[
            {"message": "Hello", "sender": "user"},
            {"sender": "system"},
            {"message": "Hi there", "sender": "assistant"}
        ]"#;

        let messages = parser.parse(&path, content).unwrap();
        assert_eq!(messages, vec!["Hello", "Hi there"]);
    }

    #[test]
    fn test_root_object_with_messages_array() {
        let parser = JsonParser::new();
        let path = PathBuf::from("chat.json");
        let content = r#"{"messages":[
            {"role": "user", "content": "Hello"},
            {"role": "assistant", "content": "Hi there"}
        ]}"#;

        let messages = parser.parse(&path, content).unwrap();
        assert_eq!(messages, vec!["Hello", "Hi there"]);
    }

    #[test]
    fn test_unrecognized_shape() {
        let parser = JsonParser::new();
        let path = PathBuf::from("chat.json");

        let messages = parser.parse(&path, r#"{"conversation": []}"#).unwrap();
        assert!(messages.is_empty());

        let messages = parser.parse(&path, "42").unwrap();
        assert!(messages.is_empty());
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let parser = JsonParser::new();
        let path = PathBuf::from("chat.json");
        assert!(parser.parse(&path, "{oops").is_err());
    }
}
