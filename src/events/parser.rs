//! GitHub event payload parser.
//!
//! Parses the JSON file named by `GITHUB_EVENT_PATH` into a typed
//! [`QueueEvent`]. Unknown fields are ignored; unknown event names return
//! `Ok(None)`.

use serde::Deserialize;
use thiserror::Error;

use crate::types::IssueNumber;

use super::types::{
    CommentEvent, EventAction, PullRequestEvent, QueueEvent, RequestInfo, RequestState,
    WorkflowRunEvent,
};

/// Error type for event parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Field has an invalid value.
    #[error("invalid field value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// Parses an event payload into a typed event.
///
/// * `Ok(Some(event))` - a known event
/// * `Ok(None)` - an event name the queue does not handle
/// * `Err(e)` - a malformed payload
///
/// # Examples
///
/// ```
/// use slack_merge_queue::events::{QueueEvent, parse_event};
///
/// let payload = br#"{
///     "action": "created",
///     "comment": { "body": "/queue" },
///     "issue": {
///         "number": 42,
///         "state": "open",
///         "title": "Fix it",
///         "html_url": "https://github.com/acme/app/pull/42",
///         "user": { "login": "octocat" }
///     }
/// }"#;
///
/// let event = parse_event("issue_comment", payload).unwrap().unwrap();
/// assert!(matches!(event, QueueEvent::Comment(_)));
/// assert_eq!(event.text(), "/queue");
///
/// assert!(parse_event("star", b"{}").unwrap().is_none());
/// ```
pub fn parse_event(event_name: &str, payload: &[u8]) -> Result<Option<QueueEvent>, ParseError> {
    match event_name {
        "issue_comment" => parse_issue_comment(payload).map(|e| Some(QueueEvent::Comment(e))),
        "pull_request" | "pull_request_target" => {
            parse_pull_request(payload).map(|e| Some(QueueEvent::PullRequest(e)))
        }
        "workflow_run" => parse_workflow_run(payload).map(|e| Some(QueueEvent::WorkflowRun(e))),
        _ => Ok(None),
    }
}

// ============================================================================
// Shared raw structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

fn parse_state(state: &str) -> Result<RequestState, ParseError> {
    match state {
        "open" => Ok(RequestState::Open),
        "closed" => Ok(RequestState::Closed),
        other => Err(ParseError::InvalidField {
            field: "state",
            value: other.to_string(),
        }),
    }
}

/// Author first, then assignees and reviewers, without repeats.
fn participants<'a>(
    author: Option<&'a RawUser>,
    others: impl IntoIterator<Item = &'a RawUser>,
) -> Vec<String> {
    let mut logins: Vec<String> = Vec::new();
    for user in author.into_iter().chain(others) {
        if !logins.contains(&user.login) {
            logins.push(user.login.clone());
        }
    }
    logins
}

// ============================================================================
// issue_comment event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawIssueCommentPayload {
    action: String,
    comment: RawComment,
    issue: RawIssue,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    number: u64,
    state: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    html_url: String,
    body: Option<String>,
    user: Option<RawUser>,
    #[serde(default)]
    assignees: Vec<RawUser>,
}

fn parse_issue_comment(payload: &[u8]) -> Result<CommentEvent, ParseError> {
    let raw: RawIssueCommentPayload = serde_json::from_slice(payload)?;
    let issue = raw.issue;

    Ok(CommentEvent {
        action: EventAction::parse(&raw.action),
        request: RequestInfo {
            number: IssueNumber(issue.number),
            state: parse_state(&issue.state)?,
            participants: participants(issue.user.as_ref(), &issue.assignees),
            title: issue.title,
            url: issue.html_url,
            body: issue.body.unwrap_or_default(),
        },
        body: raw.comment.body.unwrap_or_default(),
    })
}

// ============================================================================
// pull_request event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawPullRequestPayload {
    action: String,
    pull_request: RawPullRequest,
}

#[derive(Debug, Deserialize)]
struct RawPullRequest {
    number: u64,
    state: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    html_url: String,
    body: Option<String>,
    #[serde(default)]
    merged: bool,
    user: Option<RawUser>,
    #[serde(default)]
    assignees: Vec<RawUser>,
    #[serde(default)]
    requested_reviewers: Vec<RawUser>,
}

fn parse_pull_request(payload: &[u8]) -> Result<PullRequestEvent, ParseError> {
    let raw: RawPullRequestPayload = serde_json::from_slice(payload)?;
    let pr = raw.pull_request;

    Ok(PullRequestEvent {
        action: EventAction::parse(&raw.action),
        request: RequestInfo {
            number: IssueNumber(pr.number),
            state: parse_state(&pr.state)?,
            participants: participants(
                pr.user.as_ref(),
                pr.assignees.iter().chain(&pr.requested_reviewers),
            ),
            title: pr.title,
            url: pr.html_url,
            body: pr.body.unwrap_or_default(),
        },
        merged: pr.merged,
    })
}

// ============================================================================
// workflow_run event
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawWorkflowRunPayload {
    action: String,
    workflow_run: RawWorkflowRun,
}

#[derive(Debug, Deserialize)]
struct RawWorkflowRun {
    conclusion: Option<String>,
    #[serde(default)]
    pull_requests: Vec<RawPullRequestRef>,
}

#[derive(Debug, Deserialize)]
struct RawPullRequestRef {
    number: u64,
}

fn parse_workflow_run(payload: &[u8]) -> Result<WorkflowRunEvent, ParseError> {
    let raw: RawWorkflowRunPayload = serde_json::from_slice(payload)?;

    Ok(WorkflowRunEvent {
        action: EventAction::parse(&raw.action),
        pull_requests: raw
            .workflow_run
            .pull_requests
            .iter()
            .map(|pr| IssueNumber(pr.number))
            .collect(),
        conclusion: raw.workflow_run.conclusion,
    })
}
