//! Shared test utilities: an in-memory chat log and arbitrary generators for
//! property-based testing.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use proptest::prelude::*;

use crate::chat::{ChatClient, ChatError, PostMessage};
use crate::events::{
    CommentEvent, EventAction, PullRequestEvent, QueueEvent, RequestInfo, RequestState,
    WorkflowRunEvent,
};
use crate::queue::QueueEntry;
use crate::tag::Tag;
use crate::types::{
    Attachment, Channel, ChannelId, ChatMessage, IssueNumber, Member, MemberId, MessageTs, Page,
    QueueStatus,
};

pub const CHANNEL: &str = "C0QUEUE01";

pub fn channel_id() -> ChannelId {
    ChannelId::new(CHANNEL)
}

// ─── Generators ───

pub fn arb_issue_number() -> impl Strategy<Value = IssueNumber> {
    (1u64..1_000_000).prop_map(IssueNumber)
}

pub fn arb_queue_status() -> impl Strategy<Value = QueueStatus> {
    prop_oneof![
        Just(QueueStatus::Merging),
        Just(QueueStatus::Merged),
        Just(QueueStatus::Cancelled),
        Just(QueueStatus::Stale),
    ]
}

/// Titles without the delimiter or line breaks (no `:` at all keeps it simple).
pub fn arb_title() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,!?()#&<>|'_-]{0,60}".prop_map(String::from)
}

pub fn arb_url() -> impl Strategy<Value = String> {
    ("[a-z]{1,12}", "[a-z]{1,12}", 1u64..100_000)
        .prop_map(|(owner, repo, n)| format!("https://github.com/{owner}/{repo}/pull/{n}"))
}

/// A log of statuses, newest first.
pub fn arb_status_log(max_len: usize) -> impl Strategy<Value = Vec<QueueStatus>> {
    prop::collection::vec(arb_queue_status(), 1..max_len)
}

// ─── Log builders ───

/// A tagged message for `issue` with a title and URL derived from the number.
pub fn tag_message(ts: &str, issue: u64, status: QueueStatus) -> ChatMessage {
    let tag = Tag::new(
        IssueNumber(issue),
        status,
        &format!("Request {issue}"),
        &format!("https://github.com/acme/app/pull/{issue}"),
    );
    ChatMessage::new(ts, tag.encode())
}

/// Builds a newest-first log from `(issue, status)` pairs; timestamps decrease
/// down the list.
pub fn log(entries: &[(u64, QueueStatus)]) -> Vec<ChatMessage> {
    let len = entries.len();
    entries
        .iter()
        .enumerate()
        .map(|(i, (issue, status))| {
            tag_message(&format!("{}.000000", 1_000 + len - i), *issue, *status)
        })
        .collect()
}

/// Like [`log`], but already decoded into queue entries.
pub fn entries(layout: &[(u64, QueueStatus)]) -> Vec<QueueEntry> {
    log(layout)
        .into_iter()
        .map(|message| {
            let tag = Tag::decode(&message.text).unwrap();
            QueueEntry::new(message, tag)
        })
        .collect()
}

pub fn member(id: &str, name: &str, display_name: &str, real_name: &str) -> Member {
    Member {
        id: MemberId::new(id),
        name: name.to_string(),
        display_name: display_name.to_string(),
        display_name_normalized: display_name.to_string(),
        real_name: real_name.to_string(),
        real_name_normalized: real_name.to_string(),
        email: Some(format!("{name}@example.com")),
    }
}

/// A small roster used across watcher tests.
pub fn roster() -> Vec<Member> {
    vec![
        member("U01ALICE", "alice", "Alice", "Alice Liddell"),
        member("U02BOB", "bob", "Bobby", "Robert Paulson"),
        Member {
            email: Some("carol.danvers@example.com".to_string()),
            ..member("U03CAROL", "carol", "", "Carol Danvers")
        },
    ]
}

// ─── Events ───

/// An open request authored by `alice`, titled and linked like [`tag_message`].
pub fn request(issue: u64, open: bool, body: &str) -> RequestInfo {
    RequestInfo {
        number: IssueNumber(issue),
        state: if open {
            RequestState::Open
        } else {
            RequestState::Closed
        },
        title: format!("Request {issue}"),
        url: format!("https://github.com/acme/app/pull/{issue}"),
        body: body.to_string(),
        participants: vec!["alice".to_string()],
    }
}

/// A comment on an open request.
pub fn comment_event(issue: u64, body: &str, action: EventAction) -> QueueEvent {
    QueueEvent::Comment(CommentEvent {
        action,
        request: request(issue, true, ""),
        body: body.to_string(),
    })
}

/// A pull request event; closed ones carry the `closed` action.
pub fn pr_event(issue: u64, open: bool, merged: bool, body: &str) -> QueueEvent {
    QueueEvent::PullRequest(PullRequestEvent {
        action: if open {
            EventAction::Opened
        } else {
            EventAction::Closed
        },
        request: request(issue, open, body),
        merged,
    })
}

pub fn workflow_event(issues: &[u64]) -> QueueEvent {
    QueueEvent::WorkflowRun(WorkflowRunEvent {
        action: EventAction::Completed,
        pull_requests: issues.iter().map(|&n| IssueNumber(n)).collect(),
        conclusion: Some("failure".to_string()),
    })
}

// ─── In-memory chat ───

/// Everything the in-memory chat knows and records.
#[derive(Debug, Default)]
pub struct ChatState {
    pub channels: Vec<Channel>,
    /// Top-level messages, newest first.
    pub messages: Vec<ChatMessage>,
    /// Replies per thread root, oldest first.
    pub replies: HashMap<MessageTs, Vec<ChatMessage>>,
    pub members: Vec<Member>,

    pub history_page_calls: usize,
    pub user_info_calls: usize,
    pub posted: Vec<PostMessage>,
    pub updated: Vec<(MessageTs, String, Option<Vec<Attachment>>)>,
    pub deleted: Vec<MessageTs>,

    /// Updates to these messages fail with a transient error.
    pub failing_updates: HashSet<MessageTs>,

    /// Replies posted into these threads fail with a permanent error.
    pub failing_threads: HashSet<MessageTs>,

    next_ts: u64,
}

/// A [`ChatClient`] backed by vectors, with pagination and call recording.
#[derive(Debug)]
pub struct InMemoryChat {
    state: Mutex<ChatState>,
    members_page_size: usize,
}

impl Default for InMemoryChat {
    fn default() -> Self {
        let state = ChatState {
            channels: vec![Channel {
                id: channel_id(),
                name: "merge-queue".to_string(),
            }],
            ..ChatState::default()
        };
        InMemoryChat {
            state: Mutex::new(state),
            members_page_size: 2,
        }
    }
}

impl InMemoryChat {
    pub fn with_history(messages: Vec<ChatMessage>) -> Self {
        let chat = InMemoryChat::default();
        chat.state().messages = messages;
        chat
    }

    pub fn with_members(self, members: Vec<Member>) -> Self {
        self.state().members = members;
        self
    }

    pub fn with_replies(self, root: &str, replies: Vec<ChatMessage>) -> Self {
        self.state().replies.insert(MessageTs::from(root), replies);
        self
    }

    pub fn state(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap()
    }

    /// The current text of a top-level message.
    pub fn text_of(&self, ts: &str) -> Option<String> {
        self.state()
            .messages
            .iter()
            .find(|m| m.ts.as_str() == ts)
            .map(|m| m.text.clone())
    }

    /// The current decoded status of a top-level message.
    pub fn status_of(&self, ts: &str) -> Option<QueueStatus> {
        self.text_of(ts)
            .and_then(|text| Tag::decode(&text).ok())
            .map(|tag| tag.status)
    }

    fn page<T: Clone>(items: &[T], cursor: Option<&str>, limit: usize) -> Page<T> {
        let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let start = start.min(items.len());
        let end = (start + limit.max(1)).min(items.len());
        Page {
            items: items[start..end].to_vec(),
            next_cursor: (end < items.len()).then(|| end.to_string()),
        }
    }

    fn history_page(&self, cursor: Option<&str>, limit: usize) -> Page<ChatMessage> {
        let mut state = self.state();
        state.history_page_calls += 1;
        Self::page(&state.messages, cursor, limit)
    }

    fn thread_page(&self, root: &MessageTs, cursor: Option<&str>, limit: usize) -> Page<ChatMessage> {
        let state = self.state();
        let mut thread: Vec<ChatMessage> = state
            .messages
            .iter()
            .filter(|m| &m.ts == root)
            .cloned()
            .collect();
        thread.extend(state.replies.get(root).cloned().unwrap_or_default());
        Self::page(&thread, cursor, limit)
    }

    fn post(&self, message: &PostMessage) -> ChatMessage {
        let mut state = self.state();
        state.next_ts += 1;
        let ts = MessageTs::new(format!("9000.{:06}", state.next_ts));
        let stored = ChatMessage {
            ts: ts.clone(),
            text: message.text.clone(),
            thread_ts: message.thread_ts.clone(),
            attachments: message.attachments.clone(),
        };
        match &message.thread_ts {
            Some(root) => state
                .replies
                .entry(root.clone())
                .or_default()
                .push(stored.clone()),
            None => state.messages.insert(0, stored.clone()),
        }
        state.posted.push(message.clone());
        stored
    }

    fn update(
        &self,
        ts: &MessageTs,
        text: &str,
        attachments: Option<&[Attachment]>,
    ) -> Result<ChatMessage, ChatError> {
        let mut state = self.state();
        if state.failing_updates.contains(ts) {
            return Err(ChatError::transient("chat.update", "ratelimited"));
        }
        state
            .updated
            .push((ts.clone(), text.to_string(), attachments.map(<[Attachment]>::to_vec)));
        let message = state
            .messages
            .iter_mut()
            .find(|m| &m.ts == ts)
            .ok_or_else(|| ChatError::permanent("chat.update", "message_not_found"))?;
        message.text = text.to_string();
        if let Some(attachments) = attachments {
            message.attachments = attachments.to_vec();
        }
        Ok(message.clone())
    }

    fn delete(&self, ts: &MessageTs) -> Result<(), ChatError> {
        let mut state = self.state();
        let before = state.messages.len();
        state.messages.retain(|m| &m.ts != ts);
        let mut found = state.messages.len() != before;
        for replies in state.replies.values_mut() {
            let before = replies.len();
            replies.retain(|m| &m.ts != ts);
            found |= replies.len() != before;
        }
        if !found {
            return Err(ChatError::permanent("chat.delete", "message_not_found"));
        }
        state.deleted.push(ts.clone());
        Ok(())
    }
}

impl ChatClient for InMemoryChat {
    async fn find_channel(&self, name_or_id: &str) -> Result<Option<Channel>, ChatError> {
        let wanted = name_or_id.trim_start_matches('#');
        Ok(self
            .state()
            .channels
            .iter()
            .find(|c| c.id.as_str() == wanted || c.name == wanted)
            .cloned())
    }

    async fn list_messages(
        &self,
        _channel: &ChannelId,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<ChatMessage>, ChatError> {
        Ok(self.history_page(cursor, limit))
    }

    async fn list_thread_replies(
        &self,
        _channel: &ChannelId,
        root: &MessageTs,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<ChatMessage>, ChatError> {
        Ok(self.thread_page(root, cursor, limit))
    }

    async fn list_channel_members(
        &self,
        _channel: &ChannelId,
        cursor: Option<&str>,
    ) -> Result<Page<MemberId>, ChatError> {
        let ids: Vec<MemberId> = self.state().members.iter().map(|m| m.id.clone()).collect();
        Ok(Self::page(&ids, cursor, self.members_page_size))
    }

    async fn get_user_info(&self, id: &MemberId) -> Result<Member, ChatError> {
        let mut state = self.state();
        state.user_info_calls += 1;
        state
            .members
            .iter()
            .find(|m| &m.id == id)
            .cloned()
            .ok_or_else(|| ChatError::permanent("users.info", "user_not_found"))
    }

    async fn post_message(&self, message: &PostMessage) -> Result<ChatMessage, ChatError> {
        if let Some(root) = &message.thread_ts
            && self.state().failing_threads.contains(root)
        {
            return Err(ChatError::permanent("chat.postMessage", "invalid_auth"));
        }
        Ok(self.post(message))
    }

    async fn update_message(
        &self,
        _channel: &ChannelId,
        ts: &MessageTs,
        text: &str,
        attachments: Option<&[Attachment]>,
    ) -> Result<ChatMessage, ChatError> {
        self.update(ts, text, attachments)
    }

    async fn delete_message(&self, _channel: &ChannelId, ts: &MessageTs) -> Result<(), ChatError> {
        self.delete(ts)
    }
}
