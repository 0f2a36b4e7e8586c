//! Backoff for Slack Web API calls.
//!
//! Only [`ChatErrorKind::Transient`] failures are retried, and for calls that
//! create something only those Slack refused outright. A `Retry-After` value
//! sent with a 429 replaces the computed delay, up to `max_delay`.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::chat::{ChatError, ChatErrorKind};

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Attempts after the first one.
    pub max_retries: u32,

    /// Wait before the first retry.
    pub initial_delay: Duration,

    /// Upper bound for any single wait, including server-requested ones.
    pub max_delay: Duration,

    /// Growth factor between consecutive waits.
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Three retries, waiting 1s, 2s and 4s.
    pub const DEFAULT: Self = Self {
        max_retries: 3,
        initial_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(30),
        backoff_multiplier: 2.0,
    };

    pub fn new(
        max_retries: u32,
        initial_delay: Duration,
        max_delay: Duration,
        backoff_multiplier: f64,
    ) -> Self {
        Self {
            max_retries,
            initial_delay,
            max_delay,
            backoff_multiplier,
        }
    }

    /// `initial_delay * backoff_multiplier^retry`, capped at `max_delay`.
    /// `retry` counts from zero.
    pub fn delay_for_attempt(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }

    fn delay_after(&self, err: &ChatError, retry: u32) -> Duration {
        err.retry_after
            .map(|requested| requested.min(self.max_delay))
            .unwrap_or_else(|| self.delay_for_attempt(retry))
    }
}

/// Which failures a call may be retried after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Retry every transient error.
    RetryTransient,

    /// Retry only errors where Slack rejected the request before acting on it
    /// (rate limits). A timeout may hide a request that was carried out, and
    /// repeating a post would duplicate the message.
    RetryRejected,
}

impl RetryPolicy {
    fn allows(self, err: &ChatError) -> bool {
        match self {
            RetryPolicy::RetryTransient => err.kind == ChatErrorKind::Transient,
            RetryPolicy::RetryRejected => err.is_rejection(),
        }
    }
}

/// Calls `operation` until it succeeds, fails permanently, or the retries are
/// used up, and returns the last result.
pub async fn retry_with_backoff<T, F, Fut>(
    config: RetryConfig,
    policy: RetryPolicy,
    mut operation: F,
) -> Result<T, ChatError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ChatError>>,
{
    let mut retry = 0;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !policy.allows(&err) || retry >= config.max_retries {
            return Err(err);
        }

        let delay = config.delay_after(&err, retry);
        retry += 1;
        warn!(
            operation = %err.operation,
            retry,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "transient chat API error, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}
