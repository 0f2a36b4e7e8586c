//! The resolved settings for one invocation.

use thiserror::Error;

use crate::chat::MessageStyle;
use crate::history::HistoryOptions;
use crate::modes::Mode;

pub const DEFAULT_INIT_TRIGGER: &str = "/queue";
pub const DEFAULT_CANCEL_TRIGGER: &str = "/dequeue";
pub const DEFAULT_ALERT_MESSAGE: &str = "Heads up: this request needs attention before it can merge.";
pub const DEFAULT_MERGE_READY_MESSAGE: &str = "The request ahead of you merged. You're up next!";
pub const DEFAULT_CANCEL_READY_MESSAGE: &str =
    "The request ahead of you left the queue. You're up next!";

/// Errors from invalid settings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("no channel configured")]
    MissingChannel,

    #[error("the {name} trigger must not be empty")]
    EmptyTrigger { name: &'static str },

    #[error("history page size must be at least 1")]
    ZeroPageSize,
}

/// Phrases that start a line to enqueue or cancel a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triggers {
    pub init: String,
    pub cancel: String,
}

impl Default for Triggers {
    fn default() -> Self {
        Triggers {
            init: DEFAULT_INIT_TRIGGER.to_string(),
            cancel: DEFAULT_CANCEL_TRIGGER.to_string(),
        }
    }
}

/// Message templates posted into entry threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    /// Posted by the alert mode.
    pub alert: String,

    /// Posted to the next entry when the head merges.
    pub merge_ready: String,

    /// Posted to the next entry when the head is cancelled.
    pub cancel_ready: String,
}

impl Default for Messages {
    fn default() -> Self {
        Messages {
            alert: DEFAULT_ALERT_MESSAGE.to_string(),
            merge_ready: DEFAULT_MERGE_READY_MESSAGE.to_string(),
            cancel_ready: DEFAULT_CANCEL_READY_MESSAGE.to_string(),
        }
    }
}

/// Everything a mode needs besides the chat client and the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,

    /// Channel name (with or without `#`) or ID.
    pub channel: String,

    pub triggers: Triggers,
    pub messages: Messages,

    /// Raw `auto_notify` input; resolved per request, default on.
    pub auto_notify: Option<String>,

    /// Raw `delete_on_cancel` input; resolved per request, default off.
    pub delete_on_cancel: Option<String>,

    pub style: MessageStyle,
    pub history: HistoryOptions,
}

impl Config {
    /// A configuration with default triggers, messages and history bounds.
    pub fn new(mode: Mode, channel: impl Into<String>) -> Self {
        Config {
            mode,
            channel: channel.into(),
            triggers: Triggers::default(),
            messages: Messages::default(),
            auto_notify: None,
            delete_on_cancel: None,
            style: MessageStyle::default(),
            history: HistoryOptions::default(),
        }
    }

    /// Checks the settings every mode relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.trim().is_empty() {
            return Err(ConfigError::MissingChannel);
        }
        if self.triggers.init.trim().is_empty() {
            return Err(ConfigError::EmptyTrigger { name: "init" });
        }
        if self.triggers.cancel.trim().is_empty() {
            return Err(ConfigError::EmptyTrigger { name: "cancel" });
        }
        if self.history.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        Ok(())
    }
}
