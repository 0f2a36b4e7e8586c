//! Taking a request out of the queue on request.

use tracing::{info, instrument};

use super::{ActionOutcome, ActionStatus, Context, ModeError};
use crate::chat::ChatClient;
use crate::commands::{has_trigger, parse_directives};
use crate::config::select_bool;
use crate::events::QueueEvent;
use crate::queue::organize;

#[instrument(skip_all)]
pub(super) async fn run<C: ChatClient>(
    ctx: &Context<'_, C>,
    event: &QueueEvent,
) -> Result<ActionOutcome, ModeError> {
    let QueueEvent::Comment(comment) = event else {
        return Err(ctx.unsupported(event));
    };
    let request = &comment.request;

    if !request.is_open() {
        info!(issue = %request.number, "request already closed");
        return Ok(ActionOutcome::new(ActionStatus::AlreadyClosed));
    }

    let trigger = &ctx.config.triggers.cancel;
    if !has_trigger(&comment.body, trigger) {
        info!(trigger = %trigger, "trigger not found");
        return Ok(ActionOutcome::new(ActionStatus::TriggerNotFound));
    }

    let entries = ctx.history().fetch(&ctx.channel).await?;
    let Some(queue) = organize(&entries, request.number) else {
        info!(issue = %request.number, "request not queued, nothing to cancel");
        return Ok(ActionOutcome::new(ActionStatus::NotFound));
    };

    let directives = parse_directives(&comment.body);
    let delete = select_bool(
        [
            directives.delete_on_cancel.as_deref(),
            ctx.config.delete_on_cancel.as_deref(),
        ],
        false,
    );
    ctx.cancel(queue.current, delete).await?;
    info!(issue = %request.number, deleted = delete, "cancelled queued request");

    let next = ctx
        .promote(&queue, &ctx.config.messages.cancel_ready)
        .await?;
    Ok(ActionOutcome::new(ActionStatus::Cancelled).with_next_issue(next))
}
