//! Pure state logic for queue entries.
//!
//! This module decides what a tag should become; writing it back to the log is
//! done by the modes.

pub mod transitions;

pub use transitions::{Transition, TransitionError, apply, merge_outcome, stale_cascade};
