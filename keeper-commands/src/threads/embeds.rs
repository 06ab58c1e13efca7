use twilight_model::{
    channel::message::embed::{Embed, EmbedField},
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, UserMarker},
    },
};
use twilight_util::builder::embed::EmbedFieldBuilder;

use keeper_core::Forum;
use keeper_database::ClosureRecord;
use keeper_utils::channels::channel_mention;
use keeper_utils::embed::build_page_embed;

/// Closure records shown per stats page.
pub const RECORDS_PER_PAGE: usize = 5;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn guild_only_message() -> &'static str {
    "❌ This command only works in servers."
}

pub fn not_in_thread_message() -> &'static str {
    "❌ This command only works inside a thread or forum post."
}

pub fn already_closed_message() -> &'static str {
    "❌ This thread has already been closed."
}

pub fn wrong_forum_message(forum: Forum, channel_name: &str) -> String {
    format!(
        "❌ This command only works in {} threads of the '{}' forum.",
        forum.profile().noun,
        channel_name
    )
}

pub fn channel_not_found_message(channel_name: &str) -> String {
    format!("❌ Channel '{channel_name}' was not found or is not a forum.")
}

pub fn no_closures_message(user_id: Id<UserMarker>, channel_id: Id<ChannelMarker>) -> String {
    format!(
        "<@{}> has no closed threads in {} for the selected period.",
        user_id.get(),
        channel_mention(channel_id)
    )
}

/// Public confirmation after a thread was closed.
pub fn closed_message(forum: Option<Forum>, thread_name: &str) -> String {
    let thread_name = sanitize(thread_name);

    match forum {
        Some(forum) => {
            let profile = forum.profile();
            format!(
                "✅ {} '{}' {} and closed.",
                capitalize(profile.noun),
                thread_name,
                profile.verb
            )
        }
        None => format!("✅ Thread '{thread_name}' closed successfully."),
    }
}

/// Render closure records as stats pages, `RECORDS_PER_PAGE` per embed.
///
/// Every page carries the overall total so it reads on its own.
pub fn build_stats_pages(
    target_name: &str,
    guild_id: Id<GuildMarker>,
    channel_id: Id<ChannelMarker>,
    records: &[ClosureRecord],
) -> anyhow::Result<Vec<Embed>> {
    let title = format!(
        "Closed threads for {} | Total: {}",
        sanitize(target_name),
        records.len()
    );
    let description = format!("Channel: {}", channel_mention(channel_id));
    let total_pages = records.len().div_ceil(RECORDS_PER_PAGE);

    records
        .chunks(RECORDS_PER_PAGE)
        .enumerate()
        .map(|(index, chunk)| {
            let fields = chunk
                .iter()
                .map(|record| closure_field(guild_id, record))
                .collect();
            build_page_embed(&title, description.clone(), fields, index + 1, total_pages)
        })
        .collect()
}

fn closure_field(guild_id: Id<GuildMarker>, record: &ClosureRecord) -> EmbedField {
    let name = match record.thread_name.as_deref() {
        Some(thread_name) => format!("Thread: {}", sanitize(thread_name)),
        None => format!("Thread {}", record.thread_id),
    };
    let value = format!(
        "https://discord.com/channels/{}/{}\nClosed: {} UTC",
        guild_id.get(),
        record.thread_id,
        record.closed_at.format(TIMESTAMP_FORMAT)
    );

    EmbedFieldBuilder::new(truncate(&name, 256), value).build()
}

fn sanitize(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
