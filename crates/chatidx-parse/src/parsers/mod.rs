//! Transcript parsers for the supported file formats.

mod csv;
mod html;
mod json;
mod markdown;
mod text;

pub use self::csv::CsvParser;
pub use self::html::HtmlParser;
pub use self::json::JsonParser;
pub use self::markdown::MarkdownParser;
pub use self::text::TextParser;

use crate::error::ParseResult;
use chatidx_core::Message;
use std::path::Path;
use tracing::{debug, error, warn};

/// Trait for format-specific transcript parsers.
///
/// Parsers receive the raw file content; reading (and replacing
/// undecodable bytes) is the caller's job.
pub trait TranscriptParser: Send + Sync {
    /// Parse file content into an ordered sequence of messages.
    fn parse(&self, path: &Path, content: &str) -> ParseResult<Vec<Message>>;

    /// Supported file extensions, in dotted lowercase form.
    fn extensions(&self) -> &[&str];

    /// Check if this parser supports the given extension.
    fn supports(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Registry of transcript parsers, dispatched by file extension.
///
/// Adding a format means registering one more parser; dispatch never
/// falls through conditional chains.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn TranscriptParser>>,
}

impl ParserRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Create a registry with all built-in parsers registered.
    pub fn with_default_parsers() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TextParser::new()));
        registry.register(Box::new(MarkdownParser::new()));
        registry.register(Box::new(JsonParser::new()));
        registry.register(Box::new(HtmlParser::new()));
        registry.register(Box::new(CsvParser::new()));
        registry
    }

    /// Register a parser.
    pub fn register(&mut self, parser: Box<dyn TranscriptParser>) {
        self.parsers.push(parser);
    }

    /// Find the parser responsible for an extension (dotted or bare).
    pub fn parser_for(&self, extension: &str) -> Option<&dyn TranscriptParser> {
        let dotted = normalize_extension(extension);
        self.parsers
            .iter()
            .find(|p| p.supports(&dotted))
            .map(|p| p.as_ref())
    }

    /// Parse a file's content into messages.
    ///
    /// This never fails: unknown extensions and parser errors are logged
    /// and yield an empty message list, so a single bad file cannot take
    /// down a whole indexing run.
    pub fn extract_messages(&self, path: &Path, content: &str) -> Vec<Message> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(normalize_extension)
            .unwrap_or_default();

        let parser = match self.parser_for(&extension) {
            Some(p) => p,
            None => {
                warn!("Unsupported file format '{}': {}", extension, path.display());
                return Vec::new();
            }
        };

        match parser.parse(path, content) {
            Ok(messages) => {
                debug!("Extracted {} messages from {}", messages.len(), path.display());
                messages
            }
            Err(e) => {
                error!("Failed to parse {}: {}", path.display(), e);
                Vec::new()
            }
        }
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_default_parsers()
    }
}

/// Lowercase an extension and ensure it carries a leading dot.
fn normalize_extension(extension: &str) -> String {
    let lower = extension.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_registry_dispatch() {
        let registry = ParserRegistry::with_default_parsers();
        assert!(registry.parser_for(".txt").is_some());
        assert!(registry.parser_for("md").is_some());
        assert!(registry.parser_for(".JSON").is_some());
        assert!(registry.parser_for(".pdf").is_none());
    }

    #[test]
    fn test_unknown_extension_yields_empty() {
        let registry = ParserRegistry::with_default_parsers();
        let path = PathBuf::from("notes.docx");
        let messages = registry.extract_messages(&path, "some content");
        assert!(messages.is_empty());
    }

    #[test]
    fn test_no_extension_yields_empty() {
        let registry = ParserRegistry::with_default_parsers();
        let path = PathBuf::from("README");
        let messages = registry.extract_messages(&path, "some content");
        assert!(messages.is_empty());
    }

    #[test]
    fn test_parse_error_recovered_as_empty() {
        let registry = ParserRegistry::with_default_parsers();
        let path = PathBuf::from("broken.json");
        let messages = registry.extract_messages(&path, "{not valid json");
        assert!(messages.is_empty());
    }
}
