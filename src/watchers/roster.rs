//! Loading the channel roster.

use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::chat::{ChatClient, ChatError};
use crate::types::{ChannelId, Member, MemberId};

/// Fetches every member of `channel` with their profile.
///
/// Member IDs are paged in sequence; profiles are then fetched concurrently.
/// The roster keeps the order the platform lists members in.
#[instrument(skip(client))]
pub async fn load_roster<C: ChatClient>(
    client: &C,
    channel: &ChannelId,
) -> Result<Vec<Member>, ChatError> {
    let mut ids: Vec<MemberId> = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let page = client.list_channel_members(channel, cursor.as_deref()).await?;
        ids.extend(page.items);
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    let members = try_join_all(ids.iter().map(|id| client.get_user_info(id))).await?;
    debug!(members = members.len(), "loaded channel roster");
    Ok(members)
}
