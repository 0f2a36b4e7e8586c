//! Identifiers for requests, channels, messages and members.
//!
//! Slack hands all of these out as strings; the newtypes keep a member ID from
//! being passed where a channel ID belongs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pull request (issue) number within a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(pub u64);

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for IssueNumber {
    fn from(n: u64) -> Self {
        IssueNumber(n)
    }
}

/// A Slack channel ID (e.g. `C024BE91L`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    pub fn new(s: impl Into<String>) -> Self {
        ChannelId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A Slack message timestamp (`ts`), which doubles as the message's ID.
///
/// The value is opaque to the queue: only the log's delivery order matters.
/// It is still parsed for display in log lines.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTs(pub String);

impl MessageTs {
    pub fn new(s: impl Into<String>) -> Self {
        MessageTs(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interprets the `seconds.micros` form as a UTC instant.
    ///
    /// Returns `None` for values that are not in Slack's format.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let (secs, micros) = self.0.split_once('.').unwrap_or((&self.0, "0"));
        let secs: i64 = secs.parse().ok()?;
        let micros: u32 = micros.parse().ok()?;
        DateTime::from_timestamp(secs, micros.checked_mul(1_000)?)
    }
}

impl fmt::Display for MessageTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MessageTs {
    fn from(s: &str) -> Self {
        MessageTs(s.to_string())
    }
}

impl From<String> for MessageTs {
    fn from(s: String) -> Self {
        MessageTs(s)
    }
}

/// A Slack user ID (e.g. `U012AB3CD`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    pub fn new(s: impl Into<String>) -> Self {
        MemberId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Renders the ID as a Slack mention.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
