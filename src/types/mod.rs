//! Core domain types for the merge queue.
//!
//! This module contains the identifiers, statuses and chat records shared by
//! every other module.

pub mod ids;
pub mod message;
pub mod status;

// Re-export commonly used types at the module level
pub use ids::{ChannelId, IssueNumber, MemberId, MessageTs};
pub use message::{Attachment, Channel, ChatMessage, Member, Page};
pub use status::{QueueStatus, UnknownStatus};
