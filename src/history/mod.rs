//! Reading queue entries out of the channel log.
//!
//! History is read most-recent page first. Because pending entries cluster at
//! the recent end of the log, reading stops once enough resolved entries have
//! been seen; see [`HistoryOptions::resolved_limit`].

mod reader;

pub use reader::{HistoryOptions, HistoryReader};
