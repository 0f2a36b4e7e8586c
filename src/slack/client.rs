//! [`ChatClient`] over the Slack Web API.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::retry::{RetryConfig, RetryPolicy, retry_with_backoff};
use crate::chat::{ChatClient, ChatError, PostMessage};
use crate::types::{Attachment, Channel, ChannelId, ChatMessage, Member, MemberId, MessageTs, Page};

pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const CHANNEL_PAGE_SIZE: usize = 200;

#[derive(Debug, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<ChatMessage>,
    #[serde(default)]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
struct MembersResponse {
    #[serde(default)]
    members: Vec<MemberId>,
    #[serde(default)]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
struct ChannelInfoResponse {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    channels: Vec<Channel>,
    #[serde(default)]
    response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    user: RawUser,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    id: MemberId,
    #[serde(default)]
    name: String,
    #[serde(default)]
    real_name: Option<String>,
    #[serde(default)]
    profile: RawProfile,
}

#[derive(Debug, Default, Deserialize)]
struct RawProfile {
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    display_name_normalized: String,
    #[serde(default)]
    real_name: String,
    #[serde(default)]
    real_name_normalized: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<RawUser> for Member {
    fn from(user: RawUser) -> Self {
        let profile = user.profile;
        let real_name = if profile.real_name.is_empty() {
            user.real_name.unwrap_or_default()
        } else {
            profile.real_name
        };
        Member {
            id: user.id,
            name: user.name,
            display_name: profile.display_name,
            display_name_normalized: profile.display_name_normalized,
            real_name,
            real_name_normalized: profile.real_name_normalized,
            email: profile.email.filter(|email| !email.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WrittenMessageResponse {
    ts: MessageTs,
    #[serde(default)]
    message: Option<ChatMessage>,
}

fn next_cursor(metadata: ResponseMetadata) -> Option<String> {
    metadata.next_cursor.filter(|cursor| !cursor.is_empty())
}

/// Whether `value` looks like a conversation ID rather than a channel name.
fn looks_like_channel_id(value: &str) -> bool {
    value.len() >= 9
        && value.starts_with(['C', 'G', 'D'])
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get("retry-after")?.to_str().ok()?;
    raw.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// A Slack Web API client authenticated with a bot token.
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl SlackClient {
    pub fn new(
        api_base: impl Into<String>,
        token: impl Into<String>,
        retry: RetryConfig,
        request_timeout: Duration,
    ) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("slack-merge-queue"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()
            .map_err(|err| ChatError::from_reqwest("client setup", err))?;

        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into().trim().to_string(),
            retry,
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, String)],
    ) -> Result<T, ChatError> {
        retry_with_backoff(self.retry, RetryPolicy::RetryTransient, || {
            self.send(method, self.http.get(self.url(method)).query(query))
        })
        .await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &Value,
        policy: RetryPolicy,
    ) -> Result<T, ChatError> {
        retry_with_backoff(self.retry, policy, || {
            self.send(method, self.http.post(self.url(method)).json(payload))
        })
        .await
    }

    /// One attempt: HTTP status, then Slack's `ok` flag, then the payload.
    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ChatError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|err| ChatError::from_reqwest(method, err))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let body = response.text().await.unwrap_or_default();
            let err = ChatError::from_status(method, status.as_u16(), body);
            return Err(match retry_after {
                Some(delay) => err.with_retry_after(delay),
                None => err,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| ChatError::from_reqwest(method, err))?;
        if body.get("ok").and_then(Value::as_bool) != Some(true) {
            let code = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error");
            return Err(ChatError::from_api_error(method, code));
        }

        serde_json::from_value(body).map_err(|err| {
            ChatError::permanent(method, format!("unexpected response shape: {err}"))
        })
    }

    async fn channel_by_id(&self, id: &str) -> Result<Option<Channel>, ChatError> {
        let result: Result<ChannelInfoResponse, ChatError> = self
            .get("conversations.info", &[("channel", id.to_string())])
            .await;
        match result {
            Ok(response) => Ok(Some(response.channel)),
            Err(err) if err.message == "channel_not_found" => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn channel_by_name(&self, name: &str) -> Result<Option<Channel>, ChatError> {
        let mut cursor: Option<String> = None;
        loop {
            let mut query = vec![
                ("types", "public_channel,private_channel".to_string()),
                ("exclude_archived", "true".to_string()),
                ("limit", CHANNEL_PAGE_SIZE.to_string()),
            ];
            if let Some(cursor) = &cursor {
                query.push(("cursor", cursor.clone()));
            }

            let response: ChannelListResponse = self.get("conversations.list", &query).await?;
            if let Some(channel) = response.channels.into_iter().find(|c| c.name == name) {
                return Ok(Some(channel));
            }
            match next_cursor(response.response_metadata) {
                Some(next) => cursor = Some(next),
                None => return Ok(None),
            }
        }
    }
}

fn page_query(channel: &ChannelId, cursor: Option<&str>, limit: usize) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("channel", channel.as_str().to_string()),
        ("limit", limit.to_string()),
    ];
    if let Some(cursor) = cursor {
        query.push(("cursor", cursor.to_string()));
    }
    query
}

impl ChatClient for SlackClient {
    #[instrument(skip(self))]
    async fn find_channel(&self, name_or_id: &str) -> Result<Option<Channel>, ChatError> {
        let wanted = name_or_id.trim();
        if looks_like_channel_id(wanted) {
            return self.channel_by_id(wanted).await;
        }
        self.channel_by_name(wanted.trim_start_matches('#')).await
    }

    async fn list_messages(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<ChatMessage>, ChatError> {
        let response: MessagesResponse = self
            .get("conversations.history", &page_query(channel, cursor, limit))
            .await?;
        debug!(count = response.messages.len(), "fetched history page");
        Ok(Page {
            items: response.messages,
            next_cursor: next_cursor(response.response_metadata),
        })
    }

    async fn list_thread_replies(
        &self,
        channel: &ChannelId,
        root: &MessageTs,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page<ChatMessage>, ChatError> {
        let mut query = page_query(channel, cursor, limit);
        query.push(("ts", root.as_str().to_string()));
        let response: MessagesResponse = self.get("conversations.replies", &query).await?;
        Ok(Page {
            items: response.messages,
            next_cursor: next_cursor(response.response_metadata),
        })
    }

    async fn list_channel_members(
        &self,
        channel: &ChannelId,
        cursor: Option<&str>,
    ) -> Result<Page<MemberId>, ChatError> {
        let response: MembersResponse = self
            .get(
                "conversations.members",
                &page_query(channel, cursor, CHANNEL_PAGE_SIZE),
            )
            .await?;
        Ok(Page {
            items: response.members,
            next_cursor: next_cursor(response.response_metadata),
        })
    }

    async fn get_user_info(&self, id: &MemberId) -> Result<Member, ChatError> {
        let response: UserInfoResponse = self
            .get("users.info", &[("user", id.as_str().to_string())])
            .await?;
        Ok(response.user.into())
    }

    #[instrument(skip_all, fields(channel = %message.channel, thread = ?message.thread_ts))]
    async fn post_message(&self, message: &PostMessage) -> Result<ChatMessage, ChatError> {
        let mut payload = json!({
            "channel": message.channel,
            "text": message.text,
        });
        if !message.attachments.is_empty() {
            payload["attachments"] = json!(message.attachments);
        }
        if let Some(thread_ts) = &message.thread_ts {
            payload["thread_ts"] = json!(thread_ts);
        }
        if let Some(icon_emoji) = &message.style.icon_emoji {
            payload["icon_emoji"] = json!(icon_emoji);
        }
        if let Some(icon_url) = &message.style.icon_url {
            payload["icon_url"] = json!(icon_url);
        }
        if let Some(username) = &message.style.username {
            payload["username"] = json!(username);
        }

        let response: WrittenMessageResponse = self
            .post("chat.postMessage", &payload, RetryPolicy::RetryRejected)
            .await?;
        Ok(ChatMessage {
            ts: response.ts,
            text: message.text.clone(),
            thread_ts: message.thread_ts.clone(),
            attachments: message.attachments.clone(),
        })
    }

    #[instrument(skip(self, text, attachments))]
    async fn update_message(
        &self,
        channel: &ChannelId,
        ts: &MessageTs,
        text: &str,
        attachments: Option<&[Attachment]>,
    ) -> Result<ChatMessage, ChatError> {
        let mut payload = json!({
            "channel": channel,
            "ts": ts,
            "text": text,
        });
        if let Some(attachments) = attachments {
            payload["attachments"] = json!(attachments);
        }

        let response: WrittenMessageResponse = self
            .post("chat.update", &payload, RetryPolicy::RetryTransient)
            .await?;
        let mut updated = response
            .message
            .unwrap_or_else(|| ChatMessage::new(response.ts.clone(), text));
        updated.ts = response.ts;
        updated.text = text.to_string();
        if let Some(attachments) = attachments {
            updated.attachments = attachments.to_vec();
        }
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, channel: &ChannelId, ts: &MessageTs) -> Result<(), ChatError> {
        let payload = json!({ "channel": channel, "ts": ts });
        let _: Value = self
            .post("chat.delete", &payload, RetryPolicy::RetryRejected)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> SlackClient {
        let retry = RetryConfig::new(2, Duration::ZERO, Duration::ZERO, 1.0);
        SlackClient::new(server.base_url(), "xoxb-test", retry, DEFAULT_REQUEST_TIMEOUT).unwrap()
    }

    fn channel() -> ChannelId {
        ChannelId::new("C0QUEUE01")
    }

    #[test]
    fn channel_id_detection() {
        assert!(looks_like_channel_id("C0QUEUE01"));
        assert!(looks_like_channel_id("G01ABCDEFG"));
        assert!(!looks_like_channel_id("merge-queue"));
        assert!(!looks_like_channel_id("#merge-queue"));
        assert!(!looks_like_channel_id("C01"));
    }

    #[test]
    fn user_profile_maps_to_member() {
        let raw: RawUser = serde_json::from_value(json!({
            "id": "U02BOB",
            "name": "bob",
            "real_name": "Robert Paulson",
            "profile": {
                "display_name": "Bobby",
                "display_name_normalized": "Bobby",
                "real_name_normalized": "Robert Paulson",
                "email": "bob@example.com"
            }
        }))
        .unwrap();
        let member = Member::from(raw);
        assert_eq!(member.id, MemberId::new("U02BOB"));
        assert_eq!(member.display_name, "Bobby");
        assert_eq!(member.real_name, "Robert Paulson");
        assert_eq!(member.email_local_part(), Some("bob"));
    }

    #[tokio::test]
    async fn history_page_carries_cursor() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.history")
                .query_param("channel", "C0QUEUE01")
                .query_param("limit", "2")
                .header("authorization", "Bearer xoxb-test");
            then.status(200).json_body(json!({
                "ok": true,
                "messages": [
                    { "ts": "2.000000", "text": "second" },
                    { "ts": "1.000000", "text": "first", "attachments": [{ "title": "Watchers", "text": "<@U1>" }] }
                ],
                "has_more": true,
                "response_metadata": { "next_cursor": "bmV4dA==" }
            }));
        });

        let page = client(&server)
            .list_messages(&channel(), None, 2)
            .await
            .unwrap();
        mock.assert();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].text, "second");
        assert_eq!(page.items[1].attachments[0].text.as_deref(), Some("<@U1>"));
        assert_eq!(page.next_cursor.as_deref(), Some("bmV4dA=="));
    }

    #[tokio::test]
    async fn empty_cursor_means_last_page() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/conversations.members");
            then.status(200).json_body(json!({
                "ok": true,
                "members": ["U01ALICE"],
                "response_metadata": { "next_cursor": "" }
            }));
        });

        let page = client(&server)
            .list_channel_members(&channel(), None)
            .await
            .unwrap();
        assert_eq!(page.items, vec![MemberId::new("U01ALICE")]);
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn api_error_is_permanent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat.delete");
            then.status(200)
                .json_body(json!({ "ok": false, "error": "message_not_found" }));
        });

        let err = client(&server)
            .delete_message(&channel(), &MessageTs::new("1.0"))
            .await
            .unwrap_err();
        assert!(!err.is_retriable());
        assert_eq!(err.message, "message_not_found");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn rate_limits_are_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat.update");
            then.status(429).header("retry-after", "0").body("slow down");
        });

        let err = client(&server)
            .update_message(&channel(), &MessageTs::new("1.0"), "text", None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code, Some(429));
        assert!(err.is_retriable());
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn timed_out_post_is_not_sent_again() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat.postMessage");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(json!({ "ok": true, "channel": "C0QUEUE01", "ts": "1.0" }));
        });
        let retry = RetryConfig::new(2, Duration::ZERO, Duration::ZERO, 1.0);
        let client =
            SlackClient::new(server.base_url(), "xoxb-test", retry, Duration::from_millis(50)).unwrap();

        let message = PostMessage::new(channel(), "[merge-queue] :: 5 :: MERGING :: <u|t>");
        let err = client.post_message(&message).await.unwrap_err();

        assert!(err.is_retriable());
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn rate_limited_post_is_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat.postMessage");
            then.status(429).header("retry-after", "0");
        });

        let err = client(&server)
            .post_message(&PostMessage::new(channel(), "hello"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code, Some(429));
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn post_returns_stored_message() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/chat.postMessage");
            then.status(200).json_body(json!({
                "ok": true,
                "channel": "C0QUEUE01",
                "ts": "1700000000.000100"
            }));
        });

        let message = PostMessage::new(channel(), "hello").in_thread(MessageTs::new("1.0"));
        let posted = client(&server).post_message(&message).await.unwrap();
        mock.assert();
        assert_eq!(posted.ts, MessageTs::new("1700000000.000100"));
        assert_eq!(posted.thread_ts, Some(MessageTs::new("1.0")));
        assert_eq!(posted.text, "hello");
    }

    #[tokio::test]
    async fn find_channel_by_name_strips_hash() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.list")
                .query_param("types", "public_channel,private_channel")
                .query_param("exclude_archived", "true");
            then.status(200).json_body(json!({
                "ok": true,
                "channels": [
                    { "id": "C0GENERAL", "name": "general" },
                    { "id": "C0QUEUE01", "name": "merge-queue" }
                ],
                "response_metadata": { "next_cursor": "" }
            }));
        });

        let found = client(&server).find_channel("#merge-queue").await.unwrap();
        assert_eq!(found.map(|c| c.id), Some(channel()));
        assert_eq!(mock.calls(), 1);

        let missing = client(&server).find_channel("random").await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn thread_replies_pass_root_and_cursor() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/conversations.replies")
                .query_param("ts", "1.000000")
                .query_param("cursor", "abc");
            then.status(200).json_body(json!({
                "ok": true,
                "messages": [{ "ts": "1.000001", "text": "reply", "thread_ts": "1.000000" }]
            }));
        });

        let page = client(&server)
            .list_thread_replies(&channel(), &MessageTs::new("1.000000"), Some("abc"), 50)
            .await
            .unwrap();
        mock.assert();
        assert_eq!(page.items[0].thread_ts, Some(MessageTs::new("1.000000")));
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn unknown_channel_id_is_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/conversations.info");
            then.status(200)
                .json_body(json!({ "ok": false, "error": "channel_not_found" }));
        });

        let found = client(&server).find_channel("C0MISSING").await.unwrap();
        assert_eq!(found, None);
    }
}
