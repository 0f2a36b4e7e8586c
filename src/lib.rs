//! Slack Merge Queue - a first-in, first-out merge queue for pull requests,
//! recorded in a Slack channel's message log.
//!
//! The channel is the only state. Each queued request is a message carrying a
//! tag line such as:
//!
//! ```text
//! [merge-queue] :: 42 :: MERGING :: <https://github.com/acme/app/pull/42|Fix login>
//! ```
//!
//! Every invocation rebuilds the queue from recent history ([`history`],
//! [`queue`]), decides what changes ([`state`], [`config`]) and writes the
//! result back through a [`chat::ChatClient`]. The [`modes`] module ties
//! these together for the four workflow modes.

pub mod chat;
pub mod cli;
pub mod commands;
pub mod config;
pub mod events;
pub mod history;
pub mod modes;
pub mod outputs;
pub mod queue;
pub mod slack;
pub mod state;
pub mod tag;
pub mod types;
pub mod watchers;

#[cfg(test)]
pub(crate) mod test_utils;
