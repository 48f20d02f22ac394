//! Chatidx Config - Environment-backed configuration for the indexer.

mod config;
mod error;

pub use config::*;
pub use error::{ConfigError, ConfigResult};
