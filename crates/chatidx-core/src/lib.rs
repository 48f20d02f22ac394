//! Chatidx Core - Shared data model for the chat transcript indexer.

mod types;

pub use types::*;
