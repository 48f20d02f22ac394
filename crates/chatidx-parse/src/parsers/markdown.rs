//! Markdown transcript parser.

use super::TranscriptParser;
use crate::error::ParseResult;
use chatidx_core::Message;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag};
use std::path::Path;
use tracing::warn;

/// Parser for Markdown files.
///
/// The document is linearized block by block: paragraphs, headings, list
/// items, and blockquotes each become one message, with headings keeping
/// their `#` level and items/quotes keeping a `- ` / `> ` prefix. Blocks
/// nested inside an item or quote are folded into the enclosing message.
pub struct MarkdownParser;

/// Block kinds that produce messages.
enum Block {
    Paragraph,
    Heading(usize),
    Item,
    Quote,
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self
    }

    fn linearize(&self, markdown: &str) -> Vec<Message> {
        let parser = Parser::new(markdown);
        let mut messages: Vec<Message> = Vec::new();
        // Innermost open block collects the text events.
        let mut open_blocks: Vec<(Block, String)> = Vec::new();

        for event in parser {
            match event {
                Event::Start(Tag::Heading(level, _, _)) => {
                    open_blocks.push((Block::Heading(heading_depth(level)), String::new()));
                }
                Event::Start(Tag::Paragraph) => {
                    open_blocks.push((Block::Paragraph, String::new()));
                }
                Event::Start(Tag::Item) => {
                    open_blocks.push((Block::Item, String::new()));
                }
                Event::Start(Tag::BlockQuote) => {
                    open_blocks.push((Block::Quote, String::new()));
                }
                Event::End(Tag::Heading(_, _, _))
                | Event::End(Tag::Paragraph)
                | Event::End(Tag::Item)
                | Event::End(Tag::BlockQuote) => {
                    if let Some((block, text)) = open_blocks.pop() {
                        close_block(block, &text, &mut open_blocks, &mut messages);
                    }
                }
                Event::Text(t) => append_text(&mut open_blocks, &t),
                Event::Code(code) => append_text(&mut open_blocks, &code),
                Event::SoftBreak | Event::HardBreak => append_text(&mut open_blocks, " "),
                _ => {}
            }
        }

        messages
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptParser for MarkdownParser {
    fn parse(&self, path: &Path, content: &str) -> ParseResult<Vec<Message>> {
        let messages = self.linearize(content);

        if messages.is_empty() {
            warn!("No content extracted from markdown file: {}", path.display());
        }

        Ok(messages)
    }

    fn extensions(&self) -> &[&str] {
        &[".md"]
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn append_text(open_blocks: &mut [(Block, String)], text: &str) {
    if let Some((_, buf)) = open_blocks.last_mut() {
        buf.push_str(text);
    }
}

/// Finish a block: emit it as a message, or fold it into its parent.
fn close_block(
    block: Block,
    text: &str,
    open_blocks: &mut Vec<(Block, String)>,
    messages: &mut Vec<Message>,
) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }

    if let Some((_, parent)) = open_blocks.last_mut() {
        if !parent.is_empty() {
            parent.push(' ');
        }
        parent.push_str(text);
        return;
    }

    let message = match block {
        Block::Paragraph => text.to_string(),
        Block::Heading(depth) => format!("{} {}", "#".repeat(depth), text),
        Block::Item => format!("- {}", text),
        Block::Quote => format!("> {}", text),
    };
    messages.push(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_blocks() {
        let parser = MarkdownParser::new();
        let path = PathBuf::from("chat.md");
        let content = r#"# Session Notes

A paragraph of discussion.

## Details

- first point
- second point

> a quoted reply
"#;

        let messages = parser.parse(&path, content).unwrap();

        assert_eq!(
            messages,
            vec![
                "# Session Notes",
                "A paragraph of discussion.",
                "## Details",
                "- first point",
                "- second point",
                "> a quoted reply",
            ]
        );
    }

    #[test]
    fn test_nested_blocks_fold_into_parent() {
        let parser = MarkdownParser::new();
        let path = PathBuf::from("chat.md");
        let content = "> first line\n> second line\n";

        let messages = parser.parse(&path, content).unwrap();

        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("> "));
        assert!(messages[0].contains("first line"));
        assert!(messages[0].contains("second line"));
    }

    #[test]
    fn test_inline_code_kept() {
        let parser = MarkdownParser::new();
        let path = PathBuf::from("chat.md");
        let messages = parser.parse(&path, "Run `cargo fmt` before review.").unwrap();

        assert_eq!(messages, vec!["Run cargo fmt before review."]);
    }

    #[test]
    fn test_empty_document() {
        let parser = MarkdownParser::new();
        let path = PathBuf::from("chat.md");
        let messages = parser.parse(&path, "").unwrap();
        assert!(messages.is_empty());
    }
}
