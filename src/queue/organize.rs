//! Locating a request's entry and partitioning the pending queue around it.

use crate::types::IssueNumber;

use super::QueueEntry;

/// The pending queue as seen from one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizedQueue<'a> {
    /// The entry for the requested issue.
    pub current: &'a QueueEntry,

    /// Position of `current` in the log.
    pub current_index: usize,

    /// Pending entries more recent than `current`, in log order.
    pub ahead: Vec<&'a QueueEntry>,

    /// Pending entries older than `current`, in log order.
    pub behind: Vec<&'a QueueEntry>,

    /// The entry that moves up once `current` leaves: the oldest entry of `ahead`.
    pub next: Option<&'a QueueEntry>,
}

impl<'a> OrganizedQueue<'a> {
    /// True when nothing older is still pending, i.e. `current` is at the head.
    pub fn is_head(&self) -> bool {
        self.behind.is_empty()
    }

    /// The entry to notify when `current` leaves, if it leaves from the head.
    pub fn promotion(&self) -> Option<&'a QueueEntry> {
        if self.is_head() { self.next } else { None }
    }
}

/// Finds the pending entry for `issue` and partitions the other pending entries
/// around it.
///
/// The first (most recent) pending entry for the issue wins. Older duplicates
/// for the same issue are ordinary pending entries and land in `behind`.
/// Returns `None` when the issue has no pending entry.
///
/// # Example
///
/// ```
/// use slack_merge_queue::queue::{QueueEntry, organize};
/// use slack_merge_queue::tag::Tag;
/// use slack_merge_queue::types::{ChatMessage, IssueNumber, QueueStatus};
///
/// let entry = |ts: &str, issue: u64, status| {
///     let tag = Tag::new(IssueNumber(issue), status, "title", "https://example.com");
///     QueueEntry::new(ChatMessage::new(ts, tag.encode()), tag)
/// };
/// let log = vec![
///     entry("3.0", 3, QueueStatus::Merging),
///     entry("2.0", 2, QueueStatus::Merging),
///     entry("1.0", 1, QueueStatus::Merged),
/// ];
///
/// let queue = organize(&log, IssueNumber(2)).unwrap();
/// assert!(queue.is_head());
/// assert_eq!(queue.promotion().map(|e| e.issue()), Some(IssueNumber(3)));
/// ```
pub fn organize(entries: &[QueueEntry], issue: IssueNumber) -> Option<OrganizedQueue<'_>> {
    let current_index = entries
        .iter()
        .position(|entry| entry.is_pending() && entry.issue() == issue)?;
    let current = &entries[current_index];

    let ahead: Vec<&QueueEntry> = entries[..current_index]
        .iter()
        .filter(|entry| entry.is_pending())
        .collect();
    let behind: Vec<&QueueEntry> = entries[current_index + 1..]
        .iter()
        .filter(|entry| entry.is_pending())
        .collect();
    let next = ahead.last().copied();

    Some(OrganizedQueue {
        current,
        current_index,
        ahead,
        behind,
        next,
    })
}
