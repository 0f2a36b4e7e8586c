//! The chat-platform contract.
//!
//! The queue never talks to Slack directly. Everything goes through
//! [`ChatClient`], which keeps the core testable against an in-memory log and
//! leaves transport concerns (HTTP, auth, retry) to the implementation in
//! [`crate::slack`].
//!
//! Listings are paginated and delivered most-recent-first, as Slack does.

use std::future::Future;


use crate::types::{Attachment, Channel, ChannelId, ChatMessage, Member, MemberId, MessageTs, Page};

mod error;

pub use error::{ChatError, ChatErrorKind};

/// How posted messages present themselves in the channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageStyle {
    pub icon_emoji: Option<String>,

    pub icon_url: Option<String>,

    pub username: Option<String>,
}

/// A message to post, optionally as a thread reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessage {
    pub channel: ChannelId,
    pub text: String,
    pub attachments: Vec<Attachment>,
    pub thread_ts: Option<MessageTs>,
    pub style: MessageStyle,
}

impl PostMessage {
    /// A top-level message with no attachments and default style.
    pub fn new(channel: ChannelId, text: impl Into<String>) -> Self {
        PostMessage {
            channel,
            text: text.into(),
            attachments: Vec::new(),
            thread_ts: None,
            style: MessageStyle::default(),
        }
    }

    pub fn in_thread(mut self, root: MessageTs) -> Self {
        self.thread_ts = Some(root);
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_style(mut self, style: MessageStyle) -> Self {
        self.style = style;
        self
    }
}

/// Operations the queue needs from the chat platform.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct EmptyChannel;
///
/// impl ChatClient for EmptyChannel {
///     async fn list_messages(
///         &self,
///         _channel: &ChannelId,
///         _cursor: Option<&str>,
///         _limit: usize,
///     ) -> Result<Page<ChatMessage>, ChatError> {
///         Ok(Page { items: vec![], next_cursor: None })
///     }
///     // ...
/// }
/// ```
pub trait ChatClient {
    /// Looks a channel up by ID, or by name with or without a leading `#`.
    fn find_channel(
        &self,
        name_or_id: &str,
    ) -> impl Future<Output = Result<Option<Channel>, ChatError>> + Send;

    /// Lists one page of channel history, most recent first.
    fn list_messages(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Page<ChatMessage>, ChatError>> + Send;

    /// Lists one page of a thread. The root message may be included.
    fn list_thread_replies(
        &self,
        channel: &ChannelId,
        root: &MessageTs,
        cursor: Option<&str>,
        limit: usize,
    ) -> impl Future<Output = Result<Page<ChatMessage>, ChatError>> + Send;

    /// Lists one page of channel member IDs.
    fn list_channel_members(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
    ) -> impl Future<Output = Result<Page<MemberId>, ChatError>> + Send;

    /// Fetches a member's profile.
    fn get_user_info(
        &self,
        id: &MemberId,
    ) -> impl Future<Output = Result<Member, ChatError>> + Send;

    /// Posts a message and returns it as stored.
    fn post_message(
        &self,
        message: &PostMessage,
    ) -> impl Future<Output = Result<ChatMessage, ChatError>> + Send;

    /// Rewrites a message's text.
    ///
    /// `attachments: None` leaves the existing attachments untouched;
    /// `Some(&[])` removes them.
    fn update_message(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
        text: &str,
        attachments: Option<&[Attachment]>,
    ) -> impl Future<Output = Result<ChatMessage, ChatError>> + Send;

    /// Deletes a message.
    fn delete_message(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
    ) -> impl Future<Output = Result<(), ChatError>> + Send;
}
