//! LLM client error types and their retry classification.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Cannot reach LLM gateway at {url}")]
    Connect { url: String },

    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Rate limited by provider (HTTP 429)")]
    RateLimited,

    #[error("Service unavailable (HTTP {status}): {message}")]
    ServiceUnavailable { status: u16, message: String },

    #[error("Request rejected (HTTP {status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("Authentication failed (HTTP {status})")]
    AuthFailed { status: u16 },

    #[error("Request body too large (HTTP 413)")]
    ContextTooLarge,

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// How the retry driver should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Worth retrying with backoff.
    Transient,
    /// Retrying cannot help; fall back immediately.
    Structural,
    /// Unexpected; fall back to the generic placeholders.
    Other,
}

impl LlmError {
    /// Classify this error for the retry driver.
    pub fn class(&self) -> ErrorClass {
        match self {
            LlmError::Connect { .. }
            | LlmError::Timeout { .. }
            | LlmError::RateLimited
            | LlmError::ServiceUnavailable { .. } => ErrorClass::Transient,

            LlmError::BadRequest { .. }
            | LlmError::AuthFailed { .. }
            | LlmError::ContextTooLarge => ErrorClass::Structural,

            LlmError::Api { .. } | LlmError::MalformedResponse(_) | LlmError::Http(_) => {
                ErrorClass::Other
            }
        }
    }

    /// Map an HTTP status plus response body onto an error variant.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            429 => LlmError::RateLimited,
            401 | 403 => LlmError::AuthFailed { status },
            413 => LlmError::ContextTooLarge,
            400 => LlmError::BadRequest { status, message },
            s if s >= 500 => LlmError::ServiceUnavailable { status, message },
            _ => LlmError::Api { status, message },
        }
    }
}

pub type LlmResult<T> = Result<T, LlmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            LlmError::from_status(429, String::new()).class(),
            ErrorClass::Transient
        );
        assert_eq!(
            LlmError::from_status(503, "down".into()).class(),
            ErrorClass::Transient
        );
        assert_eq!(
            LlmError::from_status(400, "bad".into()).class(),
            ErrorClass::Structural
        );
        assert_eq!(
            LlmError::from_status(401, String::new()).class(),
            ErrorClass::Structural
        );
        assert_eq!(
            LlmError::from_status(413, String::new()).class(),
            ErrorClass::Structural
        );
        assert_eq!(
            LlmError::from_status(418, "teapot".into()).class(),
            ErrorClass::Other
        );
    }

    #[test]
    fn test_transport_classification() {
        let connect = LlmError::Connect {
            url: "http://localhost:9".into(),
        };
        assert_eq!(connect.class(), ErrorClass::Transient);

        let timeout = LlmError::Timeout { seconds: 30 };
        assert_eq!(timeout.class(), ErrorClass::Transient);

        let malformed = LlmError::MalformedResponse("no choices".into());
        assert_eq!(malformed.class(), ErrorClass::Other);
    }
}
