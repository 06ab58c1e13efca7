use std::sync::Arc;

use tracing::info;
use twilight_model::{
    application::{
        command::{Command, CommandType},
        interaction::application_command::CommandData,
    },
    channel::message::embed::Embed,
    gateway::payload::incoming::InteractionCreate,
    guild::Permissions,
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker},
    },
};
use twilight_util::builder::command::{CommandBuilder, StringBuilder, UserBuilder};

use crate::CommandMeta;
use crate::options::{StatsOptions, resolved_display_name};
use crate::threads::embeds::{
    build_stats_pages, channel_not_found_message, guild_only_message, no_closures_message,
};
use crate::threads::range::DateRange;
use keeper_core::{Context, Forum};
use keeper_database::{ClosureFilter, ClosureLedger, ClosureRecord, LedgerError};
use keeper_utils::channels::resolve_forum_channel;
use keeper_utils::interaction::respond_ephemeral_message;
use keeper_utils::pagination::{PaginationSession, handle_navigation, send_paginated_response};

pub const META: CommandMeta = CommandMeta {
    name: "stats",
    desc: "Show closed-thread statistics for a moderator.",
};

pub fn definition() -> anyhow::Result<Command> {
    let channel_choices = Forum::ALL.map(|forum| (forum.profile().label, forum.slug()));

    let command = CommandBuilder::new(META.name, META.desc, CommandType::ChatInput)
        .default_member_permissions(Permissions::MANAGE_THREADS)
        .option(UserBuilder::new("user", "Moderator whose closures to count").required(true))
        .option(
            StringBuilder::new("channel", "Forum channel to report on")
                .required(true)
                .choices(channel_choices),
        )
        .option(StringBuilder::new(
            "start_date",
            "First day to include, YYYY-MM-DD (for example 2025-01-01)",
        ))
        .option(StringBuilder::new(
            "end_date",
            "Last day to include, YYYY-MM-DD (for example 2025-01-31)",
        ))
        .validate()?
        .build();

    Ok(command)
}

/// A validated stats request. Constructing one is the only way to reach the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatsQuery {
    pub user_id: u64,
    pub range: DateRange,
}

impl StatsQuery {
    /// Matching closures in `channel_id`, oldest first.
    pub async fn collect(
        &self,
        ledger: &dyn ClosureLedger,
        channel_id: u64,
    ) -> Result<Vec<ClosureRecord>, LedgerError> {
        let mut records = ledger
            .query_closures(ClosureFilter {
                user_id: Some(self.user_id),
                channel_id: Some(channel_id),
            })
            .await?;

        records.retain(|record| self.range.contains(record.closed_at));
        records.sort_by_key(|record| (record.closed_at, record.id));

        Ok(records)
    }
}

/// What a stats request turns into before anything is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsOutcome {
    /// Bad input or unknown forum; answered privately.
    Rejected(String),
    /// Nothing matched; answered privately without embeds.
    Empty(String),
    /// One embed per page, oldest closures first.
    Pages(Vec<Embed>),
}

/// Validate, resolve the forum, query the ledger and render pages, in that order.
///
/// Malformed or reversed dates are rejected before the forum lookup, and an
/// unknown forum before the ledger is queried.
pub async fn build_report<F, Fut>(
    ledger: &dyn ClosureLedger,
    guild_id: Id<GuildMarker>,
    options: &StatsOptions,
    channel_name: &str,
    target_name: &str,
    resolve_forum: F,
) -> anyhow::Result<StatsOutcome>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<Option<Id<ChannelMarker>>>>,
{
    let dates = (options.start_date.as_deref(), options.end_date.as_deref());
    let range = match DateRange::parse(dates.0, dates.1) {
        Ok(range) => range,
        Err(rejection) => return Ok(StatsOutcome::Rejected(rejection.to_string())),
    };

    let Some(channel_id) = resolve_forum().await? else {
        return Ok(StatsOutcome::Rejected(channel_not_found_message(
            channel_name,
        )));
    };

    let query = StatsQuery {
        user_id: options.user_id.get(),
        range,
    };
    let records = query.collect(ledger, channel_id.get()).await?;

    info!(
        user_id = query.user_id,
        channel_id = channel_id.get(),
        matched = records.len(),
        "closure stats requested"
    );

    if records.is_empty() {
        return Ok(StatsOutcome::Empty(no_closures_message(
            options.user_id,
            channel_id,
        )));
    }

    let pages = build_stats_pages(target_name, guild_id, channel_id, &records)?;
    Ok(StatsOutcome::Pages(pages))
}

/// Report a moderator's closures in one forum as a paginated embed.
///
/// Rejections and empty results are answered privately. Ledger failures
/// propagate.
pub async fn run(
    ctx: Context,
    interaction: &InteractionCreate,
    data: &CommandData,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Some(guild_id) = interaction.guild_id else {
        respond_ephemeral_message(http, interaction, guild_only_message()).await?;
        return Ok(());
    };

    let Some(actor_id) = interaction.author_id() else {
        respond_ephemeral_message(http, interaction, "Unable to determine interaction user.")
            .await?;
        return Ok(());
    };

    let options = match StatsOptions::from_options(&data.options) {
        Ok(options) => options,
        Err(rejection) => {
            respond_ephemeral_message(http, interaction, &rejection.to_string()).await?;
            return Ok(());
        }
    };

    let target_name = resolved_display_name(data, options.user_id);
    let channel_name = ctx.config.forum_channel_name(options.forum);
    let resolve_forum = || async move {
        resolve_forum_channel(http, guild_id, channel_name)
            .await
            .map(|channel| channel.map(|channel| channel.id))
    };

    let outcome = build_report(
        ctx.ledger.as_ref(),
        guild_id,
        &options,
        channel_name,
        &target_name,
        resolve_forum,
    )
    .await?;

    let pages = match outcome {
        StatsOutcome::Rejected(message) | StatsOutcome::Empty(message) => {
            respond_ephemeral_message(http, interaction, &message).await?;
            return Ok(());
        }
        StatsOutcome::Pages(pages) => pages,
    };

    let Some(session) = PaginationSession::new(META.name, actor_id.get(), pages) else {
        return Ok(());
    };

    send_paginated_response(
        Arc::clone(&ctx.http),
        &ctx.pagination,
        interaction,
        session,
        ctx.config.pagination_timeout_secs,
    )
    .await
}

/// Handle control presses on `stats` responses.
pub async fn handle_pagination_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<bool> {
    handle_navigation(
        Arc::clone(&ctx.http),
        &ctx.pagination,
        &interaction,
        META.name,
        ctx.config.pagination_timeout_secs,
    )
    .await
}

#[cfg(test)]
mod tests {
    use std::future::{Ready, ready};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use keeper_database::{MemoryLedger, NewClosure};

    use super::*;

    const GUILD: Id<GuildMarker> = Id::new(1);
    const MODERATOR: u64 = 7;
    const COMPLAINTS: u64 = 300;

    /// Counts queries so tests can assert the ledger was never reached.
    #[derive(Default)]
    struct CountingLedger {
        inner: MemoryLedger,
        queries: AtomicUsize,
    }

    impl CountingLedger {
        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ClosureLedger for CountingLedger {
        async fn record_closure(
            &self,
            closure: NewClosure,
        ) -> Result<Option<ClosureRecord>, LedgerError> {
            self.inner.record_closure(closure).await
        }

        async fn was_closed(&self, thread_id: u64) -> Result<bool, LedgerError> {
            self.inner.was_closed(thread_id).await
        }

        async fn query_closures(
            &self,
            filter: ClosureFilter,
        ) -> Result<Vec<ClosureRecord>, LedgerError> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            self.inner.query_closures(filter).await
        }
    }

    type Lookup = Ready<anyhow::Result<Option<Id<ChannelMarker>>>>;

    /// A forum lookup that answers `channel` and counts its calls.
    fn forum_lookup(
        lookups: &AtomicUsize,
        channel: Option<u64>,
    ) -> impl FnOnce() -> Lookup + '_ {
        move || {
            lookups.fetch_add(1, Ordering::SeqCst);
            ready(Ok(channel.map(Id::new)))
        }
    }

    fn options(start: Option<&str>, end: Option<&str>) -> StatsOptions {
        StatsOptions {
            user_id: Id::new(MODERATOR),
            forum: Forum::Complaints,
            start_date: start.map(ToOwned::to_owned),
            end_date: end.map(ToOwned::to_owned),
        }
    }

    async fn report(
        ledger: &dyn ClosureLedger,
        options: &StatsOptions,
        lookups: &AtomicUsize,
        channel: Option<u64>,
    ) -> StatsOutcome {
        build_report(
            ledger,
            GUILD,
            options,
            "complaints",
            "Alice",
            forum_lookup(lookups, channel),
        )
        .await
        .expect("ledger available")
    }

    fn day(month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, month, day, 15, 30, 0).unwrap()
    }

    async fn seed(
        ledger: &MemoryLedger,
        thread_id: u64,
        user_id: u64,
        channel_id: u64,
        at: DateTime<Utc>,
    ) {
        ledger
            .record_closure_at(
                NewClosure {
                    thread_id,
                    user_id,
                    user_name: None,
                    thread_name: None,
                    channel_id,
                },
                at,
            )
            .await
            .expect("fresh thread");
    }

    #[tokio::test]
    async fn reversed_dates_never_reach_the_ledger() {
        let ledger = CountingLedger::default();
        let lookups = AtomicUsize::new(0);

        let outcome = report(
            &ledger,
            &options(Some("2025-02-01"), Some("2025-01-01")),
            &lookups,
            Some(COMPLAINTS),
        )
        .await;

        let StatsOutcome::Rejected(message) = outcome else {
            panic!("reversed range should be rejected, got {outcome:?}");
        };
        assert!(message.contains("2025-02-01"));
        assert!(message.contains("2025-01-01"));
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.queries(), 0);
    }

    #[tokio::test]
    async fn malformed_date_is_rejected_before_lookup() {
        let ledger = CountingLedger::default();
        let lookups = AtomicUsize::new(0);

        let outcome = report(
            &ledger,
            &options(Some("2025-1-01"), None),
            &lookups,
            Some(COMPLAINTS),
        )
        .await;

        assert!(matches!(
            outcome,
            StatsOutcome::Rejected(ref message) if message.contains("2025-1-01")
        ));
        assert_eq!(lookups.load(Ordering::SeqCst), 0);
        assert_eq!(ledger.queries(), 0);
    }

    #[tokio::test]
    async fn unknown_forum_never_reaches_the_ledger() {
        let ledger = CountingLedger::default();
        let lookups = AtomicUsize::new(0);

        let outcome = report(&ledger, &options(None, None), &lookups, None).await;

        assert_eq!(
            outcome,
            StatsOutcome::Rejected(channel_not_found_message("complaints"))
        );
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.queries(), 0);
    }

    #[tokio::test]
    async fn empty_ledger_renders_no_pages() {
        let ledger = CountingLedger::default();
        let lookups = AtomicUsize::new(0);

        let outcome = report(&ledger, &options(None, None), &lookups, Some(COMPLAINTS)).await;

        assert_eq!(
            outcome,
            StatsOutcome::Empty(no_closures_message(
                Id::new(MODERATOR),
                Id::new(COMPLAINTS)
            ))
        );
        assert_eq!(ledger.queries(), 1);
    }

    #[tokio::test]
    async fn seven_records_render_two_pages() {
        let ledger = CountingLedger::default();
        for index in 0..7 {
            let at = day(1, 1 + index as u32);
            seed(&ledger.inner, 100 + index, MODERATOR, COMPLAINTS, at).await;
        }
        seed(&ledger.inner, 200, MODERATOR, 999, day(1, 3)).await;
        seed(&ledger.inner, 201, 8, COMPLAINTS, day(1, 3)).await;
        let lookups = AtomicUsize::new(0);

        let outcome = report(&ledger, &options(None, None), &lookups, Some(COMPLAINTS)).await;

        let StatsOutcome::Pages(pages) = outcome else {
            panic!("expected pages, got {outcome:?}");
        };
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].fields.len(), 5);
        assert_eq!(pages[1].fields.len(), 2);
        assert!(pages.iter().all(|page| {
            page.title
                .as_deref()
                .is_some_and(|title| title.contains("Total: 7"))
        }));
    }

    #[tokio::test]
    async fn date_filter_is_inclusive_and_sorted() {
        let ledger = MemoryLedger::new();
        seed(&ledger, 1, MODERATOR, COMPLAINTS, day(1, 31)).await;
        seed(&ledger, 2, MODERATOR, COMPLAINTS, day(1, 10)).await;
        seed(&ledger, 3, MODERATOR, COMPLAINTS, day(1, 9)).await;
        seed(&ledger, 4, MODERATOR, COMPLAINTS, day(2, 1)).await;
        seed(&ledger, 5, MODERATOR, COMPLAINTS, day(1, 20)).await;

        let query = StatsQuery {
            user_id: MODERATOR,
            range: DateRange::parse(Some("2025-01-10"), Some("2025-01-31"))
                .expect("valid range"),
        };
        let records = query
            .collect(&ledger, COMPLAINTS)
            .await
            .expect("ledger available");

        let threads = records
            .iter()
            .map(|record| record.thread_id)
            .collect::<Vec<_>>();
        assert_eq!(threads, vec![2, 5, 1]);
    }

    #[test]
    fn definition_offers_both_forums() {
        let command = definition().expect("valid command");

        assert_eq!(command.name, "stats");
        assert_eq!(command.options.len(), 4);
        assert!(command.options[0].required.unwrap_or(false));
        assert!(command.options[1].required.unwrap_or(false));
        assert_eq!(command.options[1].choices.as_ref().map(Vec::len), Some(2));
    }
}
