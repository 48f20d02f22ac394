//! Chatidx LLM - Enrichment client for topic extraction and summarization.

mod client;
mod error;
mod fallback;
mod retry;
mod types;

pub use client::LlmClient;
pub use error::{ErrorClass, LlmError, LlmResult};
pub use retry::{run_with_retry, RetryOutcome, RetryPolicy};
pub use types::{ChatMessage, ChatRequest, ChatResponse};
