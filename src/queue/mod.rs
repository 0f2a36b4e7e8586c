//! Queue reconstruction.
//!
//! There is no queue state anywhere except the channel log. Every invocation
//! rebuilds the queue from the tagged messages it reads and then mutates the
//! log by rewriting those messages.
//!
//! Entries are always handled in log order, most recent first. "Ahead" of an
//! entry means more recent (lower index), "behind" means older (higher index).
//! The oldest pending entry is the head of the queue.

mod organize;

pub use organize::{OrganizedQueue, organize};

use crate::tag::Tag;
use crate::types::{ChatMessage, IssueNumber, MessageTs, QueueStatus};

/// A decoded queue message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub message: ChatMessage,
    pub tag: Tag,
}

impl QueueEntry {
    pub fn new(message: ChatMessage, tag: Tag) -> Self {
        QueueEntry { message, tag }
    }

    pub fn ts(&self) -> &MessageTs {
        &self.message.ts
    }

    pub fn issue(&self) -> IssueNumber {
        self.tag.issue
    }

    pub fn status(&self) -> QueueStatus {
        self.tag.status
    }

    /// True while the entry is still waiting to merge.
    pub fn is_pending(&self) -> bool {
        self.tag.status == QueueStatus::Merging
    }
}
