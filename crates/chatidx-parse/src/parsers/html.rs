//! HTML transcript parser.

use super::TranscriptParser;
use crate::error::ParseResult;
use chatidx_core::Message;
use scraper::{Html, Selector};
use std::path::Path;

/// Parser for HTML transcript exports. Each paragraph element becomes one
/// message, in document order.
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for HtmlParser {
    fn parse(&self, _path: &Path, content: &str) -> ParseResult<Vec<Message>> {
        let document = Html::parse_document(content);
        let p_sel = Selector::parse("p").unwrap();

        let messages = document
            .select(&p_sel)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();

        Ok(messages)
    }

    fn extensions(&self) -> &[&str] {
        &[".html"]
    }
}
