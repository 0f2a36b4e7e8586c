//! Command-line and action-input parsing.
//!
//! When run as a workflow step every input arrives as an `INPUT_*` environment
//! variable; flags override them for local runs.

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

use crate::chat::MessageStyle;
use crate::config::{
    Config, ConfigError, DEFAULT_ALERT_MESSAGE, DEFAULT_CANCEL_READY_MESSAGE,
    DEFAULT_CANCEL_TRIGGER, DEFAULT_INIT_TRIGGER, DEFAULT_MERGE_READY_MESSAGE, Messages, Triggers,
};
use crate::history::HistoryOptions;
use crate::modes::Mode;
use crate::slack::DEFAULT_API_BASE;

/// A merge queue kept in a Slack channel
#[derive(Debug, Clone, Parser)]
#[command(name = "slack-merge-queue", version, about)]
pub struct Cli {
    /// Bot token used for the Slack Web API
    #[arg(long, env = "INPUT_SLACK_TOKEN", hide_env_values = true)]
    pub slack_token: String,

    /// Queue channel, by name (with or without `#`) or ID
    #[arg(long, env = "INPUT_CHANNEL")]
    pub channel: String,

    /// queue (or init), cancel, merge or alert
    #[arg(long, env = "INPUT_MODE")]
    pub mode: Mode,

    #[arg(long, env = "INPUT_INIT_TRIGGER", default_value = DEFAULT_INIT_TRIGGER)]
    pub init_trigger: String,

    #[arg(long, env = "INPUT_CANCEL_TRIGGER", default_value = DEFAULT_CANCEL_TRIGGER)]
    pub cancel_trigger: String,

    #[arg(long, env = "INPUT_ALERT_MESSAGE", default_value = DEFAULT_ALERT_MESSAGE)]
    pub alert_message: String,

    #[arg(long, env = "INPUT_MERGE_READY_MESSAGE", default_value = DEFAULT_MERGE_READY_MESSAGE)]
    pub merge_ready_message: String,

    #[arg(long, env = "INPUT_CANCEL_READY_MESSAGE", default_value = DEFAULT_CANCEL_READY_MESSAGE)]
    pub cancel_ready_message: String,

    /// Notify implied watchers by default (true/false)
    #[arg(long, env = "INPUT_AUTO_NOTIFY")]
    pub auto_notify: Option<String>,

    /// Delete cancelled entries instead of marking them (true/false)
    #[arg(long, env = "INPUT_DELETE_ON_CANCEL")]
    pub delete_on_cancel: Option<String>,

    #[arg(long, env = "INPUT_ICON_EMOJI")]
    pub icon_emoji: Option<String>,

    #[arg(long, env = "INPUT_ICON_URL")]
    pub icon_url: Option<String>,

    #[arg(long, env = "INPUT_USERNAME")]
    pub username: Option<String>,

    /// Messages requested per history page
    #[arg(long, env = "INPUT_HISTORY_PAGE_SIZE", default_value_t = HistoryOptions::DEFAULT.page_size)]
    pub history_page_size: usize,

    /// Stop reading history after this many resolved entries (0 reads everything)
    #[arg(long, env = "INPUT_HISTORY_RESOLVED_LIMIT", default_value_t = HistoryOptions::DEFAULT.resolved_limit)]
    pub history_resolved_limit: usize,

    #[arg(long, env = "INPUT_SLACK_API_BASE", default_value = DEFAULT_API_BASE)]
    pub slack_api_base: String,

    /// Name of the event that triggered the workflow
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: String,

    /// Path to the JSON event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: PathBuf,

    /// File that step outputs are appended to
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_path: Option<PathBuf>,
}

/// Help and version requests end the run without it having failed.
pub fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

/// Unset workflow inputs arrive as empty strings.
fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

impl Cli {
    /// Builds and validates the invocation's [`Config`].
    pub fn config(&self) -> Result<Config, ConfigError> {
        let config = Config {
            mode: self.mode,
            channel: self.channel.trim().to_string(),
            triggers: Triggers {
                init: self.init_trigger.trim().to_string(),
                cancel: self.cancel_trigger.trim().to_string(),
            },
            messages: Messages {
                alert: or_default(&self.alert_message, DEFAULT_ALERT_MESSAGE),
                merge_ready: or_default(&self.merge_ready_message, DEFAULT_MERGE_READY_MESSAGE),
                cancel_ready: or_default(&self.cancel_ready_message, DEFAULT_CANCEL_READY_MESSAGE),
            },
            auto_notify: non_empty(&self.auto_notify),
            delete_on_cancel: non_empty(&self.delete_on_cancel),
            style: MessageStyle {
                icon_emoji: non_empty(&self.icon_emoji),
                icon_url: non_empty(&self.icon_url),
                username: non_empty(&self.username),
            },
            history: HistoryOptions {
                page_size: self.history_page_size,
                resolved_limit: self.history_resolved_limit,
            },
        };
        config.validate()?;
        Ok(config)
    }
}
