//! Explicit retry policy for remote calls.

use crate::error::{ErrorClass, LlmError, LlmResult};
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

/// Retry schedule for remote calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Wait before the first retry; doubles per retry.
    pub base_delay: Duration,
    /// Upper bound on a single wait.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Backoff before the given retry (0-based), doubling and capped.
    pub fn backoff(&self, retry_index: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry_index);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Outcome of an operation run under a [`RetryPolicy`].
///
/// Callers pick their fallback from the failure kind; no error is raised
/// out of the retry driver.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// The operation succeeded within the attempt budget.
    Success(T),
    /// Transient failures used up every attempt.
    Exhausted(LlmError),
    /// A structural failure stopped the attempts immediately.
    Structural(LlmError),
    /// An unexpected failure stopped the attempts immediately.
    Unexpected(LlmError),
}

/// Drive an async operation under the policy.
///
/// Transient errors are retried with doubling backoff; structural and
/// unexpected errors short-circuit on the first occurrence.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = LlmResult<T>>,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => return RetryOutcome::Success(value),
            Err(e) => match e.class() {
                ErrorClass::Transient => {
                    if attempt >= policy.max_attempts {
                        warn!("Giving up after {} attempts: {}", attempt, e);
                        return RetryOutcome::Exhausted(e);
                    }
                    let delay = policy.backoff(attempt - 1);
                    warn!(
                        "Transient LLM error (attempt {}/{}), retrying in {:?}: {}",
                        attempt, policy.max_attempts, delay, e
                    );
                    tokio::time::sleep(delay).await;
                }
                ErrorClass::Structural => {
                    warn!("Structural LLM error, not retrying: {}", e);
                    return RetryOutcome::Structural(e);
                }
                ErrorClass::Other => {
                    error!("Unexpected LLM error: {}", e);
                    return RetryOutcome::Unexpected(e);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts).with_base_delay(Duration::from_millis(1))
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_secs(1));
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(5), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_success_first_attempt() {
        let calls = AtomicU32::new(0);
        let outcome = run_with_retry(&fast_policy(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, LlmError>(42) }
        })
        .await;

        assert!(matches!(outcome, RetryOutcome::Success(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_then_success() {
        let calls = AtomicU32::new(0);
        let outcome = run_with_retry(&fast_policy(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(LlmError::RateLimited)
                } else {
                    Ok("done")
                }
            }
        })
        .await;

        assert!(matches!(outcome, RetryOutcome::Success("done")));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transient_exhaustion() {
        let calls = AtomicU32::new(0);
        let outcome: RetryOutcome<()> = run_with_retry(&fast_policy(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(LlmError::RateLimited) }
        })
        .await;

        assert!(matches!(outcome, RetryOutcome::Exhausted(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_structural_short_circuits() {
        let calls = AtomicU32::new(0);
        let outcome: RetryOutcome<()> = run_with_retry(&fast_policy(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(LlmError::AuthFailed { status: 401 })
            }
        })
        .await;

        assert!(matches!(outcome, RetryOutcome::Structural(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unexpected_short_circuits() {
        let calls = AtomicU32::new(0);
        let outcome: RetryOutcome<()> = run_with_retry(&fast_policy(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(LlmError::MalformedResponse("no choices".into())) }
        })
        .await;

        assert!(matches!(outcome, RetryOutcome::Unexpected(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
