//! Chat transport error types.
//!
//! Errors are categorized so the transport can decide whether to retry:
//!
//! - **Transient** errors are retriable (5xx, rate limits, timeouts)
//! - **Permanent** errors are not (bad token, unknown channel, missing scope)
//!
//! The queue logic itself never retries; any transport error ends the invocation.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The kind of chat error, categorized for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    /// Safe to retry with backoff.
    ///
    /// Examples:
    /// - HTTP 5xx
    /// - HTTP 429, or a `ratelimited` API error
    /// - Connection failures and timeouts
    Transient,

    /// Requires human intervention.
    ///
    /// Examples:
    /// - `invalid_auth`, `not_authed`, `missing_scope`
    /// - `channel_not_found`, `message_not_found`
    /// - Responses that cannot be decoded
    Permanent,
}

impl ChatErrorKind {
    /// Returns true if this error is retriable.
    pub fn is_retriable(&self) -> bool {
        matches!(self, ChatErrorKind::Transient)
    }
}

/// A chat platform error with categorization for retry decisions.
#[derive(Debug, Error)]
pub struct ChatError {
    /// The kind of error (transient or permanent).
    pub kind: ChatErrorKind,

    /// The API method that failed (e.g. `chat.update`).
    pub operation: String,

    /// The HTTP status code, if available.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// How long the server asked us to wait before retrying.
    pub retry_after: Option<Duration>,

    /// The underlying HTTP error, if available.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(
                f,
                "chat API {} failed (HTTP {}): {}",
                self.operation, code, self.message
            ),
            None => write!(f, "chat API {} failed: {}", self.operation, self.message),
        }
    }
}

impl ChatError {
    /// Creates a transient error without an HTTP source.
    pub fn transient(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ChatErrorKind::Transient,
            operation: operation.into(),
            status_code: None,
            message: message.into(),
            retry_after: None,
            source: None,
        }
    }

    /// Creates a permanent error without an HTTP source.
    pub fn permanent(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ChatErrorKind::Permanent,
            operation: operation.into(),
            status_code: None,
            message: message.into(),
            retry_after: None,
            source: None,
        }
    }

    /// Categorizes a non-success HTTP status.
    pub fn from_status(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        let kind = if is_retryable_status(status) {
            ChatErrorKind::Transient
        } else {
            ChatErrorKind::Permanent
        };
        Self {
            kind,
            operation: operation.into(),
            status_code: Some(status),
            message: body.into(),
            retry_after: None,
            source: None,
        }
    }

    /// Categorizes an `"ok": false` API response by its error code.
    pub fn from_api_error(operation: impl Into<String>, code: &str) -> Self {
        let kind = if is_transient_api_error(code) {
            ChatErrorKind::Transient
        } else {
            ChatErrorKind::Permanent
        };
        Self {
            kind,
            operation: operation.into(),
            status_code: None,
            message: code.to_string(),
            retry_after: None,
            source: None,
        }
    }

    /// Categorizes a request that never produced a usable response.
    pub fn from_reqwest(operation: impl Into<String>, err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() || err.is_connect() || err.is_request() {
            ChatErrorKind::Transient
        } else {
            ChatErrorKind::Permanent
        };
        Self {
            kind,
            operation: operation.into(),
            status_code: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
            retry_after: None,
            source: Some(err),
        }
    }

    /// Records a server-provided retry delay.
    pub fn with_retry_after(mut self, delay: Duration) -> Self {
        self.retry_after = Some(delay);
        self
    }

    pub fn is_retriable(&self) -> bool {
        self.kind.is_retriable()
    }

    /// True when Slack turned the request away without acting on it.
    pub fn is_rejection(&self) -> bool {
        self.status_code == Some(429) || self.message == "ratelimited"
    }
}

fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Slack error codes that resolve on their own.
fn is_transient_api_error(code: &str) -> bool {
    matches!(
        code,
        "ratelimited" | "internal_error" | "fatal_error" | "service_unavailable" | "request_timeout"
    )
}
