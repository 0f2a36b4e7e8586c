//! The triggering event.
//!
//! The action runs once per GitHub event. The event name and the JSON payload
//! are parsed into a [`QueueEvent`] before any mode runs; events the queue does
//! not understand are ignored.

mod types;
mod parser;

pub use types::{
    CommentEvent, EventAction, PullRequestEvent, QueueEvent, RequestInfo, RequestState,
    WorkflowRunEvent,
};
pub use parser::{ParseError, parse_event};
