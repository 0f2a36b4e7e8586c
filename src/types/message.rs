//! Chat-side records: messages, attachments, channels and members.
//!
//! These are the platform-neutral shapes exchanged with a [`ChatClient`](crate::chat::ChatClient).

use serde::{Deserialize, Serialize};

use super::ids::{ChannelId, MemberId, MessageTs};

/// A message in the channel log (or in a thread).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The message timestamp, which is also its identifier.
    pub ts: MessageTs,

    /// The message text.
    #[serde(default)]
    pub text: String,

    /// The thread root this message replies to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<MessageTs>,

    /// Structured annotations, such as the watcher list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl ChatMessage {
    pub fn new(ts: impl Into<MessageTs>, text: impl Into<String>) -> Self {
        ChatMessage {
            ts: ts.into(),
            text: text.into(),
            thread_ts: None,
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }
}

/// A titled message attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Plain-text summary for clients that cannot render attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A resolved channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
}

/// A channel member with every alias they can be referred to by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Internal user ID.
    pub id: MemberId,

    /// Short handle.
    pub name: String,

    pub display_name: String,
    pub display_name_normalized: String,
    pub real_name: String,
    pub real_name_normalized: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Member {
    /// The part of the email address before `@`, if an email is known.
    pub fn email_local_part(&self) -> Option<&str> {
        self.email
            .as_deref()
            .and_then(|email| email.split_once('@').map(|(local, _)| local))
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,

    /// Cursor for the following page; `None` when this is the last page.
    pub next_cursor: Option<String>,
}
