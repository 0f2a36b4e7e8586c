//! Status transitions for queue entries.
//!
//! Pure functions for computing an entry's next tag from its current tag and
//! the event that resolved it.
//!
//! ```text
//! MERGING ──Merged──────▶ MERGED
//!    │  └───Cancelled───▶ CANCELLED
//!    └──────Superseded──▶ STALE
//! ```
//!
//! Terminal statuses never change again. Reapplying the transition that
//! produced a terminal status is a no-op, so re-running an invocation is safe.

use thiserror::Error;

use crate::queue::{OrganizedQueue, QueueEntry};
use crate::tag::Tag;
use crate::types::QueueStatus;

/// What happened to a pending entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The request was merged.
    Merged,

    /// The request was cancelled, or closed without merging.
    Cancelled,

    /// An entry ahead of this one merged first.
    Superseded,
}

impl Transition {
    /// The status this transition leads to.
    pub fn target(self) -> QueueStatus {
        match self {
            Transition::Merged => QueueStatus::Merged,
            Transition::Cancelled => QueueStatus::Cancelled,
            Transition::Superseded => QueueStatus::Stale,
        }
    }
}

/// Error returned when a transition is not allowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot apply {transition:?} to an entry that is already {from}")]
    InvalidTransition {
        from: QueueStatus,
        transition: Transition,
    },
}

/// Computes the tag an entry should carry after `transition`.
///
/// Only the status changes; issue, title and URL are carried over verbatim.
/// Applying a transition to an entry already in its target status returns an
/// identical tag.
///
/// # Errors
///
/// Returns `TransitionError::InvalidTransition` when the entry is in a
/// different terminal status.
pub fn apply(tag: &Tag, transition: Transition) -> Result<Tag, TransitionError> {
    let target = transition.target();
    match tag.status {
        QueueStatus::Merging => Ok(tag.with_status(target)),
        status if status == target => Ok(tag.clone()),
        from => Err(TransitionError::InvalidTransition { from, transition }),
    }
}

/// The transition for a request that was closed: merged, or closed unmerged.
pub fn merge_outcome(merged: bool) -> Transition {
    if merged {
        Transition::Merged
    } else {
        Transition::Cancelled
    }
}

/// The rewrites that mark every older pending entry as stale.
///
/// Used when `current` merged while entries behind it were still waiting.
pub fn stale_cascade<'a>(queue: &OrganizedQueue<'a>) -> Vec<(&'a QueueEntry, Tag)> {
    queue
        .behind
        .iter()
        .filter_map(|entry| {
            apply(&entry.tag, Transition::Superseded)
                .ok()
                .map(|tag| (*entry, tag))
        })
        .collect()
}
