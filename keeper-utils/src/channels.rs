use twilight_http::{Client, error::ErrorType};
use twilight_model::{
    channel::{Channel, ChannelType},
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker},
    },
};

/// Whether a channel is a thread that can be archived and locked.
pub fn is_thread(channel: &Channel) -> bool {
    matches!(
        channel.kind,
        ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::AnnouncementThread
    )
}

/// Find a guild forum channel by exact name.
///
/// Returns `Ok(None)` when no channel has that name or the match is not a forum.
pub async fn resolve_forum_channel(
    http: &Client,
    guild_id: Id<GuildMarker>,
    name: &str,
) -> anyhow::Result<Option<Channel>> {
    let channels = http.guild_channels(guild_id).await?.model().await?;

    Ok(find_forum_channel(channels, name))
}

fn find_forum_channel(channels: Vec<Channel>, name: &str) -> Option<Channel> {
    channels
        .into_iter()
        .find(|channel| channel.name.as_deref() == Some(name))
        .filter(|channel| channel.kind == ChannelType::GuildForum)
}

/// Whether an HTTP error is Discord's 404 for an already removed resource.
pub fn is_not_found(source: &twilight_http::Error) -> bool {
    matches!(source.kind(), ErrorType::Response { status, .. } if status.get() == 404)
}

/// Channel mention markup.
pub fn channel_mention(channel_id: Id<ChannelMarker>) -> String {
    format!("<#{}>", channel_id.get())
}
