//! Recording a closed request.

use futures::future::join_all;
use tracing::{info, instrument, warn};

use super::{ActionOutcome, ActionStatus, Context, ModeError};
use crate::chat::ChatClient;
use crate::commands::parse_directives;
use crate::config::select_bool;
use crate::events::QueueEvent;
use crate::queue::organize;
use crate::state::{Transition, merge_outcome, stale_cascade};

#[instrument(skip_all)]
pub(super) async fn run<C: ChatClient>(
    ctx: &Context<'_, C>,
    event: &QueueEvent,
) -> Result<ActionOutcome, ModeError> {
    let QueueEvent::PullRequest(pr) = event else {
        return Err(ctx.unsupported(event));
    };
    let request = &pr.request;

    let entries = ctx.history().fetch(&ctx.channel).await?;
    let Some(queue) = organize(&entries, request.number) else {
        info!(issue = %request.number, "request not queued");
        return Ok(ActionOutcome::new(ActionStatus::NotFound));
    };

    let (status, ready_message) = match merge_outcome(pr.merged) {
        Transition::Merged => {
            ctx.transition(queue.current, Transition::Merged).await?;
            mark_stale(ctx, &queue).await;
            (ActionStatus::Merged, &ctx.config.messages.merge_ready)
        }
        _ => {
            warn!(issue = %request.number, "request closed without merging, cancelling");
            let delete = select_bool(
                [
                    parse_directives(&request.body).delete_on_cancel.as_deref(),
                    ctx.config.delete_on_cancel.as_deref(),
                ],
                false,
            );
            ctx.cancel(queue.current, delete).await?;
            (ActionStatus::Cancelled, &ctx.config.messages.cancel_ready)
        }
    };

    let next = ctx.promote(&queue, ready_message).await?;
    Ok(ActionOutcome::new(status).with_next_issue(next))
}

/// Marks every older pending entry as stale. Failures are logged, not returned.
async fn mark_stale<C: ChatClient>(ctx: &Context<'_, C>, queue: &crate::queue::OrganizedQueue<'_>) {
    let rewrites = stale_cascade(queue);
    if rewrites.is_empty() {
        return;
    }

    let results = join_all(rewrites.iter().map(|(entry, tag)| async move {
        let result = ctx
            .client
            .update_message(&ctx.channel, entry.ts(), &tag.encode(), None)
            .await;
        (entry.issue(), result)
    }))
    .await;

    let mut failed = 0usize;
    for (issue, result) in results {
        if let Err(err) = result {
            failed += 1;
            warn!(issue = %issue, error = %err, "failed to mark entry stale");
        }
    }
    info!(stale = rewrites.len() - failed, failed, "marked older entries stale");
}
