//! Tag parsing.
//!
//! Extracts the machine-readable fields from the first line of a message.

use thiserror::Error;

use super::format::{DELIM, QUEUE_PREFIX, Tag};
use crate::types::{IssueNumber, UnknownStatus};

/// Errors that can occur when decoding a tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// The text does not start with the queue prefix.
    #[error("not a queue entry")]
    NotQueueEntry,

    /// Splitting on the delimiter did not yield exactly four fields.
    #[error("expected 4 tag fields, found {found}")]
    FieldCount { found: usize },

    /// The issue field is not a number.
    #[error("invalid issue number: {0:?}")]
    InvalidIssueNumber(String),

    /// The status field is not a known status.
    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatus),
}

impl Tag {
    /// Decodes the tag on the first line of `text`.
    ///
    /// Every field is trimmed of surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TagError::NotQueueEntry` for ordinary channel chatter, and one of
    /// the other variants for text that carries the prefix but is malformed.
    pub fn decode(text: &str) -> Result<Tag, TagError> {
        let line = text.lines().next().unwrap_or_default();
        if !line.starts_with(QUEUE_PREFIX) {
            return Err(TagError::NotQueueEntry);
        }

        let fields: Vec<&str> = line.split(DELIM).map(str::trim).collect();
        let [prefix, issue, status, link] = fields.as_slice() else {
            return Err(TagError::FieldCount {
                found: fields.len(),
            });
        };

        let issue = issue
            .parse::<u64>()
            .map_err(|_| TagError::InvalidIssueNumber(issue.to_string()))?;

        Ok(Tag {
            prefix: prefix.to_string(),
            issue: IssueNumber(issue),
            status: status.parse()?,
            link: link.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QueueStatus;
    use crate::test_utils::{arb_issue_number, arb_queue_status, arb_title, arb_url};
    use proptest::prelude::*;

    mod decode {
        use super::*;

        #[test]
        fn decodes_well_formed_tag() {
            let tag = Tag::decode("[merge-queue] :: 12 :: CANCELLED :: <https://x/12|Bump deps>")
                .unwrap();
            assert_eq!(tag.issue, IssueNumber(12));
            assert_eq!(tag.status, QueueStatus::Cancelled);
            assert_eq!(tag.url(), "https://x/12");
            assert_eq!(tag.title(), "Bump deps");
        }

        #[test]
        fn only_first_line_is_considered() {
            let text = "[merge-queue] :: 3 :: MERGING :: <u|t>\nsomething :: else :: here";
            let tag = Tag::decode(text).unwrap();
            assert_eq!(tag.issue, IssueNumber(3));
            assert_eq!(tag.link(), "<u|t>");
        }

        #[test]
        fn trims_fields() {
            let tag = Tag::decode("[merge-queue] ::   5   ::  STALE  :: <u|t>  ").unwrap();
            assert_eq!(tag.issue, IssueNumber(5));
            assert_eq!(tag.status, QueueStatus::Stale);
            assert_eq!(tag.link(), "<u|t>");
        }

        #[test]
        fn chatter_is_not_a_queue_entry() {
            assert_eq!(Tag::decode("lunch?"), Err(TagError::NotQueueEntry));
            assert_eq!(Tag::decode(""), Err(TagError::NotQueueEntry));
        }

        #[test]
        fn wrong_field_count_is_malformed() {
            assert_eq!(
                Tag::decode("[merge-queue] :: 3 :: MERGING"),
                Err(TagError::FieldCount { found: 3 })
            );
            assert_eq!(
                Tag::decode("[merge-queue] :: 3 :: MERGING :: <u|t> :: extra"),
                Err(TagError::FieldCount { found: 5 })
            );
        }

        #[test]
        fn bad_issue_number_is_malformed() {
            assert_eq!(
                Tag::decode("[merge-queue] :: abc :: MERGING :: <u|t>"),
                Err(TagError::InvalidIssueNumber("abc".to_string()))
            );
        }

        #[test]
        fn unknown_status_is_malformed() {
            assert!(matches!(
                Tag::decode("[merge-queue] :: 3 :: PAUSED :: <u|t>"),
                Err(TagError::UnknownStatus(_))
            ));
        }
    }

    mod roundtrip {
        use super::*;

        proptest! {
            /// The core correctness property: decode(encode(fields)) == fields
            #[test]
            fn roundtrip_preserves_fields(
                issue in arb_issue_number(),
                status in arb_queue_status(),
                title in arb_title(),
                url in arb_url(),
            ) {
                let tag = Tag::new(issue, status, &title, &url);
                let decoded = Tag::decode(&tag.encode()).unwrap();

                prop_assert_eq!(decoded.issue, issue);
                prop_assert_eq!(decoded.status, status);
                prop_assert_eq!(decoded.title(), title);
                prop_assert_eq!(decoded.url(), url.as_str());
                prop_assert_eq!(&decoded, &tag);
            }

            /// Changing the status keeps every other byte.
            #[test]
            fn status_change_preserves_other_fields(
                issue in arb_issue_number(),
                from in arb_queue_status(),
                to in arb_queue_status(),
                title in arb_title(),
                url in arb_url(),
            ) {
                let original = Tag::new(issue, from, &title, &url).encode();
                let decoded = Tag::decode(&original).unwrap();
                let rewritten = decoded.with_status(to).encode();

                let before: Vec<&str> = original.split(DELIM).collect();
                let after: Vec<&str> = rewritten.split(DELIM).collect();
                prop_assert_eq!(before[0], after[0]);
                prop_assert_eq!(before[1], after[1]);
                prop_assert_eq!(after[2], to.as_tag_str());
                prop_assert_eq!(before[3], after[3]);
            }

            /// Arbitrary text should never cause a panic.
            #[test]
            fn arbitrary_text_never_panics(text: String) {
                let _ = Tag::decode(&text);
            }

            /// Arbitrary text after the prefix should never cause a panic.
            #[test]
            fn arbitrary_suffix_never_panics(suffix: String) {
                let _ = Tag::decode(&format!("{}{}", QUEUE_PREFIX, suffix));
            }
        }
    }
}
