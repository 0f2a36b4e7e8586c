//! Paginated history and thread reads.

use futures::future::try_join_all;
use tracing::{debug, info, instrument, warn};

use crate::chat::{ChatClient, ChatError};
use crate::queue::QueueEntry;
use crate::tag::{Tag, is_queue_message};
use crate::types::{ChannelId, ChatMessage, MessageTs};

/// Bounds on how much history is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryOptions {
    /// Messages requested per page.
    pub page_size: usize,

    /// Stop paging once this many resolved entries have been seen.
    /// Zero reads the whole log.
    pub resolved_limit: usize,
}

impl HistoryOptions {
    pub const DEFAULT: HistoryOptions = HistoryOptions {
        page_size: 100,
        resolved_limit: 20,
    };
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Reads queue entries and threads through a [`ChatClient`].
#[derive(Debug)]
pub struct HistoryReader<'a, C> {
    client: &'a C,
    options: HistoryOptions,
}

impl<'a, C: ChatClient> HistoryReader<'a, C> {
    pub fn new(client: &'a C, options: HistoryOptions) -> Self {
        HistoryReader { client, options }
    }

    /// Returns every decodable queue entry in the read part of the log, most
    /// recent first.
    ///
    /// Pages are fetched one after another, each from the previous page's
    /// cursor. Messages that carry the queue prefix but fail to decode are
    /// logged and skipped.
    ///
    /// # Errors
    ///
    /// Any failed page fetch ends the read.
    #[instrument(skip(self), fields(page_size = self.options.page_size))]
    pub async fn fetch(&self, channel: &ChannelId) -> Result<Vec<QueueEntry>, ChatError> {
        let mut entries = Vec::new();
        let mut resolved = 0usize;
        let mut pages = 0usize;
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .client
                .list_messages(channel, cursor.as_deref(), self.options.page_size)
                .await?;
            pages += 1;

            for message in page.items {
                if !is_queue_message(&message.text) {
                    continue;
                }
                match Tag::decode(&message.text) {
                    Ok(tag) => {
                        if tag.status.is_terminal() {
                            resolved += 1;
                        }
                        entries.push(QueueEntry::new(message, tag));
                    }
                    Err(err) => {
                        warn!(ts = %message.ts, error = %err, "skipping malformed queue entry");
                    }
                }
            }

            if self.options.resolved_limit > 0 && resolved >= self.options.resolved_limit {
                debug!(resolved, "resolved limit reached, not reading older history");
                break;
            }
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        if let Some(oldest) = entries.last() {
            debug!(
                oldest_ts = %oldest.ts(),
                oldest_at = ?oldest.ts().to_datetime(),
                "oldest queue entry read"
            );
        }
        info!(pages, entries = entries.len(), resolved, "read queue history");
        Ok(entries)
    }

    /// Returns the replies in a thread, without the root message.
    pub async fn thread_replies(
        &self,
        channel: &ChannelId,
        root: &MessageTs,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let mut replies = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .client
                .list_thread_replies(channel, root, cursor.as_deref(), self.options.page_size)
                .await?;
            replies.extend(page.items.into_iter().filter(|m| &m.ts != root));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(replies)
    }

    /// Deletes a message together with all of its thread replies.
    ///
    /// Replies are deleted first, so a failure never leaves orphaned replies
    /// without their root. Returns the number of replies removed.
    #[instrument(skip(self))]
    pub async fn delete_thread(
        &self,
        channel: &ChannelId,
        root: &MessageTs,
    ) -> Result<usize, ChatError> {
        let replies = self.thread_replies(channel, root).await?;
        try_join_all(
            replies
                .iter()
                .map(|reply| self.client.delete_message(channel, &reply.ts)),
        )
        .await?;
        self.client.delete_message(channel, root).await?;
        info!(replies = replies.len(), "deleted queue entry thread");
        Ok(replies.len())
    }
}
