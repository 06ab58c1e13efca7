use tracing::{debug, info};
use twilight_model::{
    application::command::{Command, CommandType},
    gateway::payload::incoming::InteractionCreate,
    guild::Permissions,
};
use twilight_util::builder::command::CommandBuilder;

use crate::CommandMeta;
use crate::threads::embeds::{
    already_closed_message, closed_message, guild_only_message, not_in_thread_message,
    wrong_forum_message,
};
use keeper_core::{Context, Forum};
use keeper_database::{ClosureLedger, ClosureRecord, LedgerError, NewClosure};
use keeper_utils::channels::{is_thread, resolve_forum_channel};
use keeper_utils::interaction::{respond_ephemeral_message, respond_public_message};

pub const THREAD_META: CommandMeta = CommandMeta {
    name: "close-thread",
    desc: "Close and lock the current thread.",
};

pub const COMPLAINT_META: CommandMeta = CommandMeta {
    name: "close-complaint",
    desc: "Mark the current complaint as reviewed and close it.",
};

pub const APPEAL_META: CommandMeta = CommandMeta {
    name: "close-appeal",
    desc: "Mark the current appeal as resolved and close it.",
};

/// Close commands and the forum each one is restricted to.
pub const VARIANTS: [(CommandMeta, Option<Forum>); 3] = [
    (THREAD_META, None),
    (COMPLAINT_META, Some(Forum::Complaints)),
    (APPEAL_META, Some(Forum::Appeals)),
];

/// The forum restriction of the close command called `name`.
///
/// `None` when `name` is not a close command.
pub fn variant_for(name: &str) -> Option<Option<Forum>> {
    VARIANTS
        .iter()
        .find_map(|(meta, forum)| (meta.name == name).then_some(*forum))
}

pub fn definition(meta: &CommandMeta) -> anyhow::Result<Command> {
    let command = CommandBuilder::new(meta.name, meta.desc, CommandType::ChatInput)
        .default_member_permissions(Permissions::MANAGE_THREADS)
        .validate()?
        .build();

    Ok(command)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed(ClosureRecord),
    AlreadyClosed,
}

/// Record a closure unless the thread was closed before.
///
/// The ledger's uniqueness check decides races between concurrent closers.
pub async fn record_once(
    ledger: &dyn ClosureLedger,
    closure: NewClosure,
) -> Result<CloseOutcome, LedgerError> {
    let thread_id = closure.thread_id;
    match ledger.record_closure(closure).await? {
        Some(record) => Ok(CloseOutcome::Closed(record)),
        None => {
            debug!(thread_id, "thread already has a closure record");
            Ok(CloseOutcome::AlreadyClosed)
        }
    }
}

/// Close the thread the command was used in.
///
/// With `expected` set, the thread must belong to that forum.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    expected: Option<Forum>,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Some(guild_id) = interaction.guild_id else {
        respond_ephemeral_message(http, interaction, guild_only_message()).await?;
        return Ok(());
    };

    let Some(thread) = interaction.channel.as_ref().filter(|channel| is_thread(channel)) else {
        respond_ephemeral_message(http, interaction, not_in_thread_message()).await?;
        return Ok(());
    };

    if ctx.ledger.was_closed(thread.id.get()).await? {
        respond_ephemeral_message(http, interaction, already_closed_message()).await?;
        return Ok(());
    }

    if let Some(forum) = expected {
        let channel_name = ctx.config.forum_channel_name(forum);
        let forum_channel = resolve_forum_channel(http, guild_id, channel_name).await?;
        let in_forum = forum_channel
            .is_some_and(|forum_channel| thread.parent_id == Some(forum_channel.id));

        if !in_forum {
            let wrong_forum = wrong_forum_message(forum, channel_name);
            respond_ephemeral_message(http, interaction, &wrong_forum).await?;
            return Ok(());
        }
    }

    let Some(author) = interaction.author() else {
        respond_ephemeral_message(http, interaction, "Unable to determine interaction user.")
            .await?;
        return Ok(());
    };

    let thread_name = thread.name.clone();
    let closure = NewClosure {
        thread_id: thread.id.get(),
        user_id: author.id.get(),
        user_name: Some(author.name.clone()),
        thread_name: thread_name.clone(),
        channel_id: thread.parent_id.map_or(thread.id.get(), |parent| parent.get()),
    };

    let record = match record_once(ctx.ledger.as_ref(), closure).await? {
        CloseOutcome::Closed(record) => record,
        CloseOutcome::AlreadyClosed => {
            respond_ephemeral_message(http, interaction, already_closed_message()).await?;
            return Ok(());
        }
    };

    info!(
        thread_id = record.thread_id,
        user_id = record.user_id,
        channel_id = record.channel_id,
        "thread closed"
    );

    let display_name = thread_name.unwrap_or_else(|| format!("Thread {}", thread.id.get()));
    let confirmation = closed_message(expected, &display_name);
    respond_public_message(http, interaction, &confirmation).await?;

    http.update_thread(thread.id)
        .archived(true)
        .locked(true)
        .await?;

    Ok(())
}
