//! The four things the action can be asked to do.
//!
//! - **queue**: add a request to the queue when its trigger is found
//! - **cancel**: take a request out of the queue when its cancel trigger is found
//! - **merge**: record a closed request as merged or cancelled
//! - **alert**: post a message in the thread of queued requests
//!
//! Each mode reads the channel history once, reconstructs the queue, and then
//! rewrites or posts messages. Writes that do not depend on each other run
//! concurrently; a failed write among them is logged and the rest stand.

mod alert;
mod cancel;
mod merge;
mod outcome;
mod queue;

pub use outcome::{ActionOutcome, ActionStatus};

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, instrument};

use crate::chat::{ChatClient, ChatError, PostMessage};
use crate::config::Config;
use crate::events::QueueEvent;
use crate::history::HistoryReader;
use crate::queue::{OrganizedQueue, QueueEntry};
use crate::state::{Transition, TransitionError, apply};
use crate::types::{ChannelId, ChatMessage, IssueNumber};
use crate::watchers::watcher_mentions;

/// Which operation an invocation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Queue,
    Cancel,
    Merge,
    Alert,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Queue => "queue",
            Mode::Cancel => "cancel",
            Mode::Merge => "merge",
            Mode::Alert => "alert",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognized mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown mode {0:?} (expected queue, cancel, merge or alert)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    /// Accepts `init` as another name for `queue`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queue" | "init" => Ok(Mode::Queue),
            "cancel" => Ok(Mode::Cancel),
            "merge" => Ok(Mode::Merge),
            "alert" => Ok(Mode::Alert),
            _ => Err(UnknownMode(s.to_string())),
        }
    }
}

/// Errors that end an invocation.
#[derive(Debug, Error)]
pub enum ModeError {
    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("channel {0:?} not found")]
    ChannelNotFound(String),

    #[error("{mode} mode cannot handle {event} events")]
    UnsupportedEvent { mode: Mode, event: &'static str },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Runs the configured mode for one event.
///
/// # Errors
///
/// Chat failures, an unknown channel, and events the mode cannot use are
/// errors. Everything else, including "not queued", is reported through the
/// returned outcome.
#[instrument(skip_all, fields(mode = %config.mode, event = event.kind()))]
pub async fn run<C: ChatClient>(
    config: &Config,
    client: &C,
    event: &QueueEvent,
) -> Result<ActionOutcome, ModeError> {
    let channel = client
        .find_channel(&config.channel)
        .await?
        .ok_or_else(|| ModeError::ChannelNotFound(config.channel.clone()))?;
    info!(channel = %channel.id, name = %channel.name, "resolved queue channel");

    let ctx = Context {
        client,
        config,
        channel: channel.id,
    };
    let outcome = match config.mode {
        Mode::Queue => queue::run(&ctx, event).await?,
        Mode::Cancel => cancel::run(&ctx, event).await?,
        Mode::Merge => merge::run(&ctx, event).await?,
        Mode::Alert => alert::run(&ctx, event).await?,
    };
    info!(status = %outcome.status, next = ?outcome.next_issue, "queue action finished");
    Ok(outcome)
}

/// What every mode works with.
struct Context<'a, C> {
    client: &'a C,
    config: &'a Config,
    channel: ChannelId,
}

impl<'a, C: ChatClient> Context<'a, C> {
    fn history(&self) -> HistoryReader<'a, C> {
        HistoryReader::new(self.client, self.config.history)
    }

    fn unsupported(&self, event: &QueueEvent) -> ModeError {
        ModeError::UnsupportedEvent {
            mode: self.config.mode,
            event: event.kind(),
        }
    }

    /// Posts `message` in the entry's thread, mentioning its watchers.
    async fn notify(&self, entry: &QueueEntry, message: &str) -> Result<ChatMessage, ChatError> {
        let text = notice_text(message, watcher_mentions(&entry.message.attachments));
        let post = PostMessage::new(self.channel.clone(), text)
            .in_thread(entry.ts().clone())
            .with_style(self.config.style.clone());
        self.client.post_message(&post).await
    }

    /// Tells the next entry it is up, if the leaving entry was at the head.
    async fn promote(
        &self,
        queue: &OrganizedQueue<'_>,
        message: &str,
    ) -> Result<Option<IssueNumber>, ChatError> {
        let Some(next) = queue.promotion() else {
            if let Some(next) = queue.next {
                info!(next = %next.issue(), behind = queue.behind.len(), "not at the head, no promotion");
            }
            return Ok(None);
        };
        self.notify(next, message).await?;
        info!(next = %next.issue(), "promoted next entry");
        Ok(Some(next.issue()))
    }

    /// Rewrites an entry's tag for `transition`, keeping its attachments.
    async fn transition(&self, entry: &QueueEntry, transition: Transition) -> Result<(), ModeError> {
        let tag = apply(&entry.tag, transition)?;
        self.client
            .update_message(&self.channel, entry.ts(), &tag.encode(), None)
            .await?;
        info!(issue = %entry.issue(), status = %tag.status, "updated queue entry");
        Ok(())
    }

    /// Takes a cancelled entry out of the queue, by rewriting or deleting it.
    async fn cancel(&self, entry: &QueueEntry, delete: bool) -> Result<(), ModeError> {
        if delete {
            self.history().delete_thread(&self.channel, entry.ts()).await?;
            Ok(())
        } else {
            self.transition(entry, Transition::Cancelled).await
        }
    }
}

/// A thread notice: the message, then the watcher mentions if there are any.
fn notice_text(message: &str, mentions: &str) -> String {
    if mentions.is_empty() {
        message.to_string()
    } else {
        format!("{message} {mentions}")
    }
}
