//! Parsing of queue commands in request text.
//!
//! Requests interact with the queue through their description and comments:
//!
//! - A line starting with the configured trigger (e.g. `/queue`) enqueues or
//!   cancels the request, depending on the mode.
//! - `notify: @alice, bob` lines name extra watchers.
//! - `delete-on-cancel: yes` and `auto-notify: no` lines override the
//!   corresponding action inputs for this request.
//!
//! # Example
//!
//! ```
//! use slack_merge_queue::commands::{has_trigger, parse_directives};
//!
//! let body = "Ready to go.\n/queue\nnotify: @alice, <@U02BOB>";
//! assert!(has_trigger(body, "/queue"));
//!
//! let directives = parse_directives(body);
//! assert_eq!(directives.notify, vec!["alice", "U02BOB"]);
//! assert_eq!(directives.delete_on_cancel, None);
//! ```

mod parser;
mod types;

pub use parser::{clean_name, has_trigger, parse_directives};
pub use types::Directives;
