//! Posting an alert in the thread of queued requests.

use futures::future::join_all;
use tracing::{info, instrument, warn};

use super::{ActionOutcome, ActionStatus, Context, ModeError};
use crate::chat::ChatClient;
use crate::events::QueueEvent;
use crate::queue::{QueueEntry, organize};
use crate::types::IssueNumber;

#[instrument(skip_all)]
pub(super) async fn run<C: ChatClient>(
    ctx: &Context<'_, C>,
    event: &QueueEvent,
) -> Result<ActionOutcome, ModeError> {
    let mut issues: Vec<IssueNumber> = event.issue_numbers();
    issues.sort();
    issues.dedup();
    if issues.is_empty() {
        info!("event refers to no requests");
        return Ok(ActionOutcome::new(ActionStatus::NotFound));
    }

    let entries = ctx.history().fetch(&ctx.channel).await?;
    let targets: Vec<&QueueEntry> = issues
        .iter()
        .filter_map(|issue| organize(&entries, *issue).map(|queue| queue.current))
        .collect();
    if targets.is_empty() {
        info!(?issues, "no pending queue entry to alert");
        return Ok(ActionOutcome::new(ActionStatus::NotFound));
    }

    let message = &ctx.config.messages.alert;
    let results = join_all(targets.iter().map(|entry| async move {
        (entry.issue(), ctx.notify(entry, message).await)
    }))
    .await;

    let mut posted = 0usize;
    let mut first_error = None;
    for (issue, result) in results {
        match result {
            Ok(_) => {
                posted += 1;
                info!(issue = %issue, "alert posted");
            }
            Err(err) => {
                warn!(issue = %issue, error = %err, "failed to post alert");
                first_error.get_or_insert(err);
            }
        }
    }

    // Some alerts reaching their threads is enough; none at all is a failure.
    match first_error {
        Some(err) if posted == 0 => Err(err.into()),
        _ => Ok(ActionOutcome::new(ActionStatus::Completed)),
    }
}
