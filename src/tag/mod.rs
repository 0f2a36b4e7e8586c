//! Queue tag encoding and decoding.
//!
//! A queue entry is a chat message whose first line is a machine-readable tag.
//! The tag is also readable by humans, so it doubles as the entry's summary.
//!
//! # Format
//!
//! ```text
//! [merge-queue] :: 42 :: MERGING :: <https://github.com/acme/app/pull/42|Fix the flaky test>
//! ```
//!
//! Fields are joined by [`DELIM`]. The last field is Slack link markup
//! combining the request's URL and title.

pub mod format;
pub mod parse;

pub use format::{DELIM, QUEUE_PREFIX, Tag, is_queue_message};
pub use parse::TagError;
