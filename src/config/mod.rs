//! Invocation configuration.
//!
//! Settings arrive as action inputs (see [`crate::cli`]) and are resolved once,
//! before any queue logic runs. Per-request overrides written in the request
//! text are combined with these settings through [`select_bool`].

mod precedence;
mod settings;

pub use precedence::{BOOL_WORDS, parse_bool, select_bool, select_first};
pub use settings::{
    Config, ConfigError, DEFAULT_CANCEL_READY_MESSAGE, DEFAULT_CANCEL_TRIGGER, DEFAULT_INIT_TRIGGER,
    DEFAULT_MERGE_READY_MESSAGE, DEFAULT_ALERT_MESSAGE, Messages, Triggers,
};
