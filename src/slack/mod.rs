//! The Slack Web API transport.
//!
//! [`SlackClient`] implements [`ChatClient`](crate::chat::ChatClient) with a
//! bot token. Every call goes through [`retry_with_backoff`], so rate limits
//! and 5xx responses are retried here and nowhere else. Posts and deletes
//! are only repeated after a rate limit, never after a timeout.

mod client;
mod retry;

pub use client::{DEFAULT_API_BASE, DEFAULT_REQUEST_TIMEOUT, SlackClient};
pub use retry::{RetryConfig, RetryPolicy, retry_with_backoff};
