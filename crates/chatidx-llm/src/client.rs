//! HTTP client for the LLM gateway.

use crate::error::{LlmError, LlmResult};
use crate::fallback::{
    count_summary, keyword_topics, placeholder_topics, word_count, EMPTY_SUMMARY, GENERIC_TOPIC,
    TOO_BRIEF_SUMMARY,
};
use crate::retry::{run_with_retry, RetryOutcome, RetryPolicy};
use crate::types::{ChatRequest, ChatResponse};
use chatidx_core::Message;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Joined message text is cut here before being sent to the model.
const MAX_PROMPT_CHARS: usize = 15_000;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

const TOPIC_SYSTEM_PROMPT: &str = "You are a topic extraction assistant. Extract exactly the \
     requested number of key topics and return only those topics as a comma-separated list with \
     no explanations or other text.";

const SUMMARY_SYSTEM_PROMPT: &str = "You are a summarization assistant. Create a concise, \
     accurate summary of the provided conversation.";

/// Client for an OpenAI-compatible chat completions endpoint.
///
/// `extract_topics` and `summarize` never fail: remote errors run through
/// the retry policy and end in a locally computed fallback, so one flaky
/// gateway cannot take down an indexing run.
pub struct LlmClient {
    client: Client,
    base_url: String,
    provider: String,
    api_key: String,
    timeout: Duration,
    retry: RetryPolicy,
    min_request_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl LlmClient {
    /// Create a client for the given provider (model identifier).
    pub fn new(provider: impl Into<String>, api_key: impl Into<String>) -> LlmResult<Self> {
        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(LlmError::Http)?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            provider: provider.into(),
            api_key: api_key.into(),
            timeout,
            retry: RetryPolicy::default(),
            min_request_interval: Duration::from_secs(1),
            last_request: Mutex::new(None),
        })
    }

    /// Point the client at a different gateway.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Replace the retry schedule.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the minimum delay between outbound requests.
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Extract up to `max_keywords` topics from the messages.
    ///
    /// Empty input returns an empty list without a remote call. When the
    /// call cannot succeed, structural failures and retry exhaustion fall
    /// back to local word-frequency extraction; anything unexpected falls
    /// back to generic placeholder topics.
    pub async fn extract_topics(&self, messages: &[Message], max_keywords: usize) -> Vec<String> {
        if messages.is_empty() {
            warn!("No messages provided for topic extraction");
            return Vec::new();
        }

        let text = join_messages(messages);
        let request = ChatRequest::new(&self.provider)
            .with_system(TOPIC_SYSTEM_PROMPT)
            .with_user(format!(
                "Extract exactly {} key topics from this chat conversation. Return them as a \
                 comma-separated list with no additional text:\n\n{}",
                max_keywords, text
            ))
            .with_temperature(0.3);

        match run_with_retry(&self.retry, || self.complete(&request)).await {
            RetryOutcome::Success(content) => {
                let topics: Vec<String> = content
                    .split(',')
                    .map(str::trim)
                    .filter(|topic| !topic.is_empty())
                    .map(String::from)
                    .take(max_keywords)
                    .collect();

                if topics.is_empty() {
                    info!("Model returned no usable topics, using generic fallback");
                    vec![GENERIC_TOPIC.to_string()]
                } else {
                    topics
                }
            }
            RetryOutcome::Exhausted(e) | RetryOutcome::Structural(e) => {
                warn!(
                    "Topic extraction failed ({} chars sent), falling back to word frequency: {}",
                    text.len(),
                    e
                );
                keyword_topics(&text, max_keywords)
            }
            RetryOutcome::Unexpected(e) => {
                error!("Unexpected failure during topic extraction: {}", e);
                placeholder_topics(max_keywords)
            }
        }
    }

    /// Generate a one-paragraph summary of the messages.
    ///
    /// Empty input returns a fixed string without a remote call; failures
    /// fall back to a templated summary built from message and word counts.
    pub async fn summarize(&self, messages: &[Message]) -> String {
        if messages.is_empty() {
            warn!("No messages provided for summarization");
            return EMPTY_SUMMARY.to_string();
        }

        let text = join_messages(messages);
        let request = ChatRequest::new(&self.provider)
            .with_system(SUMMARY_SYSTEM_PROMPT)
            .with_user(format!(
                "Summarize this chat conversation in a concise paragraph:\n\n{}",
                text
            ))
            .with_temperature(0.3);

        match run_with_retry(&self.retry, || self.complete(&request)).await {
            RetryOutcome::Success(content) if content.is_empty() => {
                info!("Model returned an empty summary");
                TOO_BRIEF_SUMMARY.to_string()
            }
            RetryOutcome::Success(content) => content,
            RetryOutcome::Exhausted(e) | RetryOutcome::Structural(e) => {
                warn!(
                    "Summarization failed ({} chars sent), falling back to counts: {}",
                    text.len(),
                    e
                );
                count_summary(messages.len(), total_words(messages))
            }
            RetryOutcome::Unexpected(e) => {
                error!("Unexpected failure during summarization: {}", e);
                count_summary(messages.len(), total_words(messages))
            }
        }
    }

    /// One chat completion round trip.
    ///
    /// Returns the trimmed content of the first choice; an empty string is
    /// a valid result (the model had nothing to say), while a response
    /// without choices is malformed.
    async fn complete(&self, request: &ChatRequest) -> LlmResult<String> {
        self.wait_for_rate_limit().await;

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::Connect {
                        url: self.base_url.clone(),
                    }
                } else if e.is_timeout() {
                    LlmError::Timeout {
                        seconds: self.timeout.as_secs(),
                    }
                } else {
                    LlmError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status.as_u16(), text));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        match chat.content() {
            Some(content) => Ok(content.trim().to_string()),
            None => Err(LlmError::MalformedResponse(
                "response carried no choices".to_string(),
            )),
        }
    }

    /// Wait until the minimum interval since the previous request has
    /// elapsed, then record the current request time.
    async fn wait_for_rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_request_interval {
                let wait = self.min_request_interval - elapsed;
                debug!("Rate limiting: waiting {:?} before next request", wait);
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Join messages with newlines, cut at [`MAX_PROMPT_CHARS`] on a char
/// boundary, and append an ellipsis when anything was dropped.
fn join_messages(messages: &[Message]) -> String {
    let joined = messages.join("\n");
    if joined.len() <= MAX_PROMPT_CHARS {
        return joined;
    }

    let mut cut = MAX_PROMPT_CHARS;
    while !joined.is_char_boundary(cut) {
        cut -= 1;
    }
    info!("Message text truncated to {} characters for the model", cut);
    format!("{}...", &joined[..cut])
}

fn total_words(messages: &[Message]) -> usize {
    messages.iter().map(|m| word_count(m)).sum()
}
