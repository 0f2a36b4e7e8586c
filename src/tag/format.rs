//! Tag formatting.
//!
//! Titles are sanitized on the way in: the delimiter is collapsed to `" : "`,
//! line breaks become spaces, and `&`, `<`, `>` are escaped as Slack requires.
//! [`Tag::title`] reverses the escaping, so titles free of the delimiter and of
//! line breaks survive a round trip unchanged.

use std::fmt;

use crate::types::{IssueNumber, QueueStatus};

/// The marker that begins every queue tag.
pub const QUEUE_PREFIX: &str = "[merge-queue]";

/// The separator between tag fields.
pub const DELIM: &str = " :: ";

/// What the delimiter is collapsed to inside titles.
const DELIM_REPLACEMENT: &str = " : ";

/// Returns true if the message text looks like a queue entry.
///
/// This is the cheap prefix test used when scanning history; decoding may still fail.
pub fn is_queue_message(text: &str) -> bool {
    text.starts_with(QUEUE_PREFIX)
}

/// The decoded machine-readable state of one queue entry.
///
/// The prefix and the link markup are kept verbatim, so changing the status and
/// re-encoding leaves every other byte of the tag untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub(crate) prefix: String,

    /// The request this entry represents.
    pub issue: IssueNumber,

    /// The entry's queue status.
    pub status: QueueStatus,

    /// Slack link markup, normally `<url|title>`.
    pub(crate) link: String,
}

impl Tag {
    /// Builds a tag for a request.
    pub fn new(issue: IssueNumber, status: QueueStatus, title: &str, url: &str) -> Self {
        Tag {
            prefix: QUEUE_PREFIX.to_string(),
            issue,
            status,
            link: format_link(url, title),
        }
    }

    /// Serializes the tag to its single-line text form.
    pub fn encode(&self) -> String {
        [
            self.prefix.as_str(),
            &self.issue.0.to_string(),
            self.status.as_tag_str(),
            self.link.as_str(),
        ]
        .join(DELIM)
    }

    /// Returns a copy of this tag with a different status.
    pub fn with_status(&self, status: QueueStatus) -> Self {
        Tag {
            status,
            ..self.clone()
        }
    }

    /// The raw link markup.
    pub fn link(&self) -> &str {
        &self.link
    }

    /// The request URL from the link markup.
    ///
    /// If the field is not markup, the whole field is returned.
    pub fn url(&self) -> &str {
        match link_inner(&self.link) {
            Some(inner) => inner.split_once('|').map_or(inner, |(url, _)| url),
            None => &self.link,
        }
    }

    /// The request title from the link markup, with Slack escaping removed.
    pub fn title(&self) -> String {
        link_inner(&self.link)
            .and_then(|inner| inner.split_once('|'))
            .map(|(_, title)| unescape(title))
            .unwrap_or_default()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Formats `<url|title>` markup.
fn format_link(url: &str, title: &str) -> String {
    format!("<{}|{}>", url.trim(), escape(&sanitize_title(title)))
}

/// Strips the angle brackets of link markup.
fn link_inner(link: &str) -> Option<&str> {
    link.strip_prefix('<')?.strip_suffix('>')
}

/// Removes anything that would break the one-line, delimited layout.
fn sanitize_title(title: &str) -> String {
    let mut title = title.replace(['\r', '\n'], " ");
    // A single pass can leave a new delimiter behind (" :: :: "), so repeat.
    while title.contains(DELIM) {
        title = title.replace(DELIM, DELIM_REPLACEMENT);
    }
    title
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
