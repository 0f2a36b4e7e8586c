//! Watchers: channel members mentioned when an entry changes.
//!
//! Names come from `notify:` directives and, with auto-notify on, from the
//! request's participants. They are resolved against the channel roster and
//! attached to the queue entry as a titled attachment. Names that match no
//! member are dropped.

mod builder;
mod resolve;
mod roster;

pub use builder::{WATCHERS_TITLE, WatcherSet, build_watcher_set, watcher_mentions};
pub use resolve::{aliases, resolve};
pub use roster::load_roster;
