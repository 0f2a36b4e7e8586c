//! The result reported back to the workflow.

use std::fmt;

use crate::types::IssueNumber;

/// The `status` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionStatus {
    AddedToQueue,
    AlreadyQueued,
    NotFound,
    TriggerNotFound,
    AlreadyClosed,
    WatchersUpdated,
    Merged,
    Cancelled,
    Completed,
    Failed,
}

impl ActionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionStatus::AddedToQueue => "ADDED_TO_QUEUE",
            ActionStatus::AlreadyQueued => "ALREADY_QUEUED",
            ActionStatus::NotFound => "NOT_FOUND",
            ActionStatus::TriggerNotFound => "TRIGGER_NOT_FOUND",
            ActionStatus::AlreadyClosed => "ALREADY_CLOSED",
            ActionStatus::WatchersUpdated => "WATCHERS_UPDATED",
            ActionStatus::Merged => "MERGED",
            ActionStatus::Cancelled => "CANCELLED",
            ActionStatus::Completed => "COMPLETED",
            ActionStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub status: ActionStatus,

    /// The entry that was told it is up next.
    pub next_issue: Option<IssueNumber>,

    /// Whether the trigger was found; only reported by the queue mode.
    pub triggered: Option<bool>,
}

impl ActionOutcome {
    pub fn new(status: ActionStatus) -> Self {
        ActionOutcome {
            status,
            next_issue: None,
            triggered: None,
        }
    }

    pub fn with_next_issue(mut self, next: Option<IssueNumber>) -> Self {
        self.next_issue = next;
        self
    }

    pub fn with_triggered(mut self, triggered: bool) -> Self {
        self.triggered = Some(triggered);
        self
    }

    /// The action outputs as `(name, value)` pairs.
    pub fn outputs(&self) -> Vec<(&'static str, String)> {
        let mut outputs = vec![("status", self.status.to_string())];
        if let Some(next) = self.next_issue {
            outputs.push(("next_pr", next.0.to_string()));
        }
        if let Some(triggered) = self.triggered {
            outputs.push(("triggered", triggered.to_string()));
        }
        outputs
    }
}
