//! Building the watcher attachment.

use tracing::debug;

use super::resolve::resolve;
use crate::commands::parse_directives;
use crate::types::{Attachment, Member, MemberId};

/// Title of the attachment that carries watcher mentions.
pub const WATCHERS_TITLE: &str = "Watchers";

/// Resolved watchers, deduplicated, in first-mention order.
///
/// Never empty: [`build_watcher_set`] returns `None` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherSet {
    members: Vec<MemberId>,
}

impl WatcherSet {
    pub fn ids(&self) -> &[MemberId] {
        &self.members
    }

    /// Space-separated Slack mentions.
    pub fn mentions(&self) -> String {
        self.members
            .iter()
            .map(MemberId::mention)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The attachment stored on the queue entry.
    pub fn attachment(&self) -> Attachment {
        let mentions = self.mentions();
        Attachment {
            title: Some(WATCHERS_TITLE.to_string()),
            fallback: Some(format!("{WATCHERS_TITLE}: {mentions}")),
            text: Some(mentions),
            color: None,
        }
    }
}

/// Resolves the `notify:` names in `directive_text` followed by
/// `implied_names` against `members`.
///
/// Unresolved names are dropped. Returns `None` when nobody resolves, so that
/// callers attach nothing rather than an empty list.
pub fn build_watcher_set(
    directive_text: &str,
    implied_names: &[String],
    members: &[Member],
) -> Option<WatcherSet> {
    let explicit = parse_directives(directive_text).notify;

    let mut ids: Vec<MemberId> = Vec::new();
    for name in explicit.iter().chain(implied_names) {
        match resolve(name, members) {
            Some(member) if !ids.contains(&member.id) => ids.push(member.id.clone()),
            Some(_) => {}
            None => debug!(name = %name, "watcher name did not resolve"),
        }
    }

    (!ids.is_empty()).then_some(WatcherSet { members: ids })
}

/// Reads the mention text back from an entry's attachments, or `""` if the
/// entry has no watchers.
pub fn watcher_mentions(attachments: &[Attachment]) -> &str {
    attachments
        .iter()
        .find(|a| a.title.as_deref() == Some(WATCHERS_TITLE))
        .and_then(|a| a.text.as_deref())
        .unwrap_or_default()
}
