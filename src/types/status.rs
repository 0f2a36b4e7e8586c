//! Queue entry status as recorded in a tag.

use std::fmt;
use std::str::FromStr;

/// The state of a queue entry.
///
/// Entries are created as `Merging` and move to exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueStatus {
    /// The request is queued and pending.
    Merging,

    /// The request was merged.
    Merged,

    /// The request was cancelled, or closed without merging.
    Cancelled,

    /// An older request merged ahead of this one; its queue position is outdated.
    Stale,
}

impl QueueStatus {
    /// The spelling used inside tags.
    pub fn as_tag_str(&self) -> &'static str {
        match self {
            QueueStatus::Merging => "MERGING",
            QueueStatus::Merged => "MERGED",
            QueueStatus::Cancelled => "CANCELLED",
            QueueStatus::Stale => "STALE",
        }
    }

    /// Returns true for `Merged`, `Cancelled` and `Stale`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, QueueStatus::Merging)
    }
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag_str())
    }
}

/// Error returned when a tag carries a status word we do not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown queue status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for QueueStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MERGING" => Ok(QueueStatus::Merging),
            "MERGED" => Ok(QueueStatus::Merged),
            "CANCELLED" => Ok(QueueStatus::Cancelled),
            "STALE" => Ok(QueueStatus::Stale),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
