use std::{env, str::FromStr};

use anyhow::{Context as _, anyhow};
use twilight_model::id::{Id, marker::GuildMarker};

use crate::Forum;
use keeper_utils::pagination::DEFAULT_TIMEOUT_SECS;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Runtime settings read from the process environment (and `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    /// Postgres URL; the in-memory ledger is used when absent.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Register commands for this guild only instead of globally.
    pub guild_id: Option<Id<GuildMarker>>,
    pub complaints_channel: String,
    pub appeals_channel: String,
    pub pagination_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let discord_token =
            get("DISCORD_TOKEN").ok_or_else(|| anyhow!("DISCORD_TOKEN is not set"))?;

        let guild_id = parse_optional::<u64>(get("GUILD_ID"), "GUILD_ID")?
            .map(|raw| Id::new_checked(raw).ok_or_else(|| anyhow!("GUILD_ID must be non-zero")))
            .transpose()?;

        Ok(Self {
            discord_token,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_optional(
                get("DATABASE_MAX_CONNECTIONS"),
                "DATABASE_MAX_CONNECTIONS",
            )?
            .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            guild_id,
            complaints_channel: get("COMPLAINTS_CHANNEL")
                .unwrap_or_else(|| Forum::Complaints.slug().to_owned()),
            appeals_channel: get("APPEALS_CHANNEL")
                .unwrap_or_else(|| Forum::Appeals.slug().to_owned()),
            pagination_timeout_secs: parse_optional(
                get("PAGINATION_TIMEOUT_SECS"),
                "PAGINATION_TIMEOUT_SECS",
            )?
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Guild channel name the forum is looked up by.
    pub fn forum_channel_name(&self, forum: Forum) -> &str {
        match forum {
            Forum::Complaints => &self.complaints_channel,
            Forum::Appeals => &self.appeals_channel,
        }
    }
}

fn parse_optional<T>(raw: Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.map(|value| {
        value
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {value:?}"))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<HashMap<_, _>>();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = config(&[("DISCORD_TOKEN", "token")]).expect("valid config");

        assert_eq!(config.discord_token, "token");
        assert!(config.database_url.is_none());
        assert!(config.guild_id.is_none());
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.pagination_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.forum_channel_name(Forum::Complaints), "complaints");
        assert_eq!(config.forum_channel_name(Forum::Appeals), "appeals");
    }

    #[test]
    fn overrides_are_read() {
        let config = config(&[
            ("DISCORD_TOKEN", "token"),
            ("DATABASE_URL", "postgres://localhost/keeper"),
            ("GUILD_ID", "1234"),
            ("COMPLAINTS_CHANNEL", "жалобы"),
            ("APPEALS_CHANNEL", "обжалования"),
            ("PAGINATION_TIMEOUT_SECS", "60"),
        ])
        .expect("valid config");

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/keeper")
        );
        assert_eq!(config.guild_id, Some(Id::new(1234)));
        assert_eq!(config.forum_channel_name(Forum::Complaints), "жалобы");
        assert_eq!(config.forum_channel_name(Forum::Appeals), "обжалования");
        assert_eq!(config.pagination_timeout_secs, 60);
    }

    #[test]
    fn missing_token_and_bad_numbers_are_errors() {
        assert!(config(&[]).is_err());
        assert!(config(&[("DISCORD_TOKEN", "   ")]).is_err());
        assert!(config(&[("DISCORD_TOKEN", "token"), ("GUILD_ID", "0")]).is_err());
        assert!(
            config(&[
                ("DISCORD_TOKEN", "token"),
                ("PAGINATION_TIMEOUT_SECS", "soon")
            ])
            .is_err()
        );
    }
}
