//! Adding a request to the queue.

use tracing::{debug, info, instrument};

use super::{ActionOutcome, ActionStatus, Context, ModeError};
use crate::chat::{ChatClient, PostMessage};
use crate::commands::{has_trigger, parse_directives};
use crate::config::select_bool;
use crate::events::{EventAction, QueueEvent};
use crate::queue::organize;
use crate::tag::Tag;
use crate::types::{Attachment, QueueStatus};
use crate::watchers::{build_watcher_set, load_roster, watcher_mentions};

#[instrument(skip_all)]
pub(super) async fn run<C: ChatClient>(
    ctx: &Context<'_, C>,
    event: &QueueEvent,
) -> Result<ActionOutcome, ModeError> {
    let request = event.request().ok_or_else(|| ctx.unsupported(event))?;

    if !request.is_open() {
        info!(issue = %request.number, "request already closed");
        return Ok(ActionOutcome::new(ActionStatus::AlreadyClosed).with_triggered(false));
    }

    let text = event.text();
    let trigger = &ctx.config.triggers.init;
    if !has_trigger(text, trigger) {
        info!(trigger = %trigger, "trigger not found");
        return Ok(ActionOutcome::new(ActionStatus::TriggerNotFound).with_triggered(false));
    }

    let directives = parse_directives(text);
    let auto_notify = select_bool(
        [
            directives.auto_notify.as_deref(),
            ctx.config.auto_notify.as_deref(),
        ],
        true,
    );
    let implied: &[String] = if auto_notify {
        &request.participants
    } else {
        &[]
    };

    let entries = ctx.history().fetch(&ctx.channel).await?;
    let existing = organize(&entries, request.number).map(|queue| queue.current);

    let attachments: Vec<Attachment> = if directives.notify.is_empty() && implied.is_empty() {
        Vec::new()
    } else {
        let members = load_roster(ctx.client, &ctx.channel).await?;
        build_watcher_set(text, implied, &members)
            .map(|watchers| vec![watchers.attachment()])
            .unwrap_or_default()
    };
    debug!(watchers = watcher_mentions(&attachments), "resolved watchers");

    if let Some(entry) = existing {
        let changed = watcher_mentions(&entry.message.attachments) != watcher_mentions(&attachments);
        if event.action() == EventAction::Edited && changed {
            ctx.client
                .update_message(&ctx.channel, entry.ts(), &entry.message.text, Some(&attachments))
                .await?;
            info!(issue = %request.number, "updated watchers of queued request");
            return Ok(ActionOutcome::new(ActionStatus::WatchersUpdated).with_triggered(true));
        }
        info!(issue = %request.number, ts = %entry.ts(), "request already queued");
        return Ok(ActionOutcome::new(ActionStatus::AlreadyQueued).with_triggered(true));
    }

    let tag = Tag::new(request.number, QueueStatus::Merging, &request.title, &request.url);
    let post = PostMessage::new(ctx.channel.clone(), tag.encode())
        .with_attachments(attachments)
        .with_style(ctx.config.style.clone());
    let posted = ctx.client.post_message(&post).await?;
    info!(issue = %request.number, ts = %posted.ts, "added request to queue");

    Ok(ActionOutcome::new(ActionStatus::AddedToQueue).with_triggered(true))
}
