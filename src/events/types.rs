//! Typed representations of the GitHub events the queue handles.
//!
//! - `issue_comment` - triggers in comments (queue and cancel)
//! - `pull_request` / `pull_request_target` - closing and merging (merge),
//!   triggers in the description (queue)
//! - `workflow_run` - failed checks (alert)


use crate::types::IssueNumber;

/// A parsed triggering event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    /// A comment on a request was created, edited or deleted.
    ///
    /// Comments on pull requests arrive as issue comments.
    Comment(CommentEvent),

    /// A pull request changed: opened, edited, closed, and so on.
    PullRequest(PullRequestEvent),

    /// A workflow run changed state.
    WorkflowRun(WorkflowRunEvent),
}

impl QueueEvent {
    /// The event name as GitHub spells it, for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            QueueEvent::Comment(_) => "issue_comment",
            QueueEvent::PullRequest(_) => "pull_request",
            QueueEvent::WorkflowRun(_) => "workflow_run",
        }
    }

    pub fn action(&self) -> EventAction {
        match self {
            QueueEvent::Comment(e) => e.action,
            QueueEvent::PullRequest(e) => e.action,
            QueueEvent::WorkflowRun(e) => e.action,
        }
    }

    /// The request this event is about, if it is about exactly one.
    pub fn request(&self) -> Option<&RequestInfo> {
        match self {
            QueueEvent::Comment(e) => Some(&e.request),
            QueueEvent::PullRequest(e) => Some(&e.request),
            QueueEvent::WorkflowRun(_) => None,
        }
    }

    /// Every request number the event refers to.
    pub fn issue_numbers(&self) -> Vec<IssueNumber> {
        match self {
            QueueEvent::WorkflowRun(e) => e.pull_requests.clone(),
            _ => self.request().map(|r| r.number).into_iter().collect(),
        }
    }

    /// The free text that may carry triggers and directives: the comment body,
    /// or the pull request description.
    pub fn text(&self) -> &str {
        match self {
            QueueEvent::Comment(e) => &e.body,
            QueueEvent::PullRequest(e) => &e.request.body,
            QueueEvent::WorkflowRun(_) => "",
        }
    }
}

/// The `action` field of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventAction {
    Created,
    Edited,
    Deleted,
    Opened,
    Closed,
    Reopened,
    Synchronize,
    Requested,
    InProgress,
    Completed,
    /// Any action the queue has no use for.
    Other,
}

impl EventAction {
    /// Maps GitHub's spelling, case-insensitively.
    pub fn parse(action: &str) -> Self {
        match action.to_ascii_lowercase().as_str() {
            "created" => EventAction::Created,
            "edited" => EventAction::Edited,
            "deleted" => EventAction::Deleted,
            "opened" => EventAction::Opened,
            "closed" => EventAction::Closed,
            "reopened" => EventAction::Reopened,
            "synchronize" => EventAction::Synchronize,
            "requested" => EventAction::Requested,
            "in_progress" => EventAction::InProgress,
            "completed" => EventAction::Completed,
            _ => EventAction::Other,
        }
    }
}

/// Whether a request is still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Open,
    Closed,
}

/// What the queue needs to know about a request (issue or pull request).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub number: IssueNumber,
    pub state: RequestState,
    pub title: String,

    /// The request's web page.
    pub url: String,

    /// The description; empty when none was written.
    pub body: String,

    /// Logins of the author, assignees and requested reviewers, deduplicated.
    pub participants: Vec<String>,
}

impl RequestInfo {
    pub fn is_open(&self) -> bool {
        self.state == RequestState::Open
    }
}

/// An `issue_comment` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEvent {
    pub action: EventAction,
    pub request: RequestInfo,

    /// The comment text; empty for deleted comments.
    pub body: String,
}

/// A `pull_request` or `pull_request_target` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub action: EventAction,
    pub request: RequestInfo,

    /// True once the pull request has been merged.
    pub merged: bool,
}

/// A `workflow_run` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRunEvent {
    pub action: EventAction,

    /// Pull requests the run belongs to.
    pub pull_requests: Vec<IssueNumber>,

    /// `success`, `failure`, ... once the run completed.
    pub conclusion: Option<String>,
}
