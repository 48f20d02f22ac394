//! Chatidx Index - JSON index and Markdown digest writers.

mod builder;
mod error;

pub use builder::{file_timestamp, IndexBuilder};
pub use error::{IndexError, IndexResult};
