//! Chatidx Parse - Transcript parsers for the supported chat file formats.

mod error;
mod parsers;

pub use error::{ParseError, ParseResult};
pub use parsers::*;
