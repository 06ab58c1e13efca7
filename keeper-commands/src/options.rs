//! Typed views over slash-command options.

use twilight_model::{
    application::interaction::application_command::{
        CommandData, CommandDataOption, CommandOptionValue,
    },
    id::{Id, marker::UserMarker},
};

use keeper_core::Forum;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("❌ Missing required option `{0}`.")]
    Missing(&'static str),
    #[error("❌ Channel '{0}' is not allowed. Choose one of: {allowed}.", allowed = allowed_forums())]
    InvalidChannel(String),
}

fn allowed_forums() -> String {
    Forum::ALL.map(Forum::slug).join(", ")
}

/// Arguments of the `stats` command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsOptions {
    pub user_id: Id<UserMarker>,
    pub forum: Forum,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl StatsOptions {
    pub fn from_options(options: &[CommandDataOption]) -> Result<Self, OptionError> {
        let user_id = options
            .iter()
            .find_map(|option| match (&*option.name, &option.value) {
                ("user", CommandOptionValue::User(id)) => Some(*id),
                _ => None,
            })
            .ok_or(OptionError::Missing("user"))?;

        let raw_channel =
            string_option(options, "channel").ok_or(OptionError::Missing("channel"))?;
        let forum = Forum::from_slug(raw_channel)
            .ok_or_else(|| OptionError::InvalidChannel(raw_channel.to_owned()))?;

        Ok(Self {
            user_id,
            forum,
            start_date: string_option(options, "start_date").map(ToOwned::to_owned),
            end_date: string_option(options, "end_date").map(ToOwned::to_owned),
        })
    }
}

fn string_option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a str> {
    options.iter().find_map(|option| match &option.value {
        CommandOptionValue::String(value) if option.name == name => Some(value.as_str()),
        _ => None,
    })
}

/// Best display name for a user resolved in the command payload.
///
/// Guild nickname, then global name, then username.
pub fn resolved_display_name(data: &CommandData, user_id: Id<UserMarker>) -> String {
    let resolved = data.resolved.as_ref();

    let nick = resolved
        .and_then(|resolved| resolved.members.get(&user_id))
        .and_then(|member| member.nick.clone());
    if let Some(nick) = nick {
        return nick;
    }

    resolved
        .and_then(|resolved| resolved.users.get(&user_id))
        .map(|user| user.global_name.clone().unwrap_or_else(|| user.name.clone()))
        .unwrap_or_else(|| format!("User {}", user_id.get()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(name: &str, value: CommandOptionValue) -> CommandDataOption {
        CommandDataOption {
            name: name.to_owned(),
            value,
        }
    }

    fn string(name: &str, value: &str) -> CommandDataOption {
        option(name, CommandOptionValue::String(value.to_owned()))
    }

    #[test]
    fn parses_required_and_optional_arguments() {
        let options = vec![
            option("user", CommandOptionValue::User(Id::new(77))),
            string("channel", "appeals"),
            string("start_date", "2025-01-01"),
        ];

        let parsed = StatsOptions::from_options(&options).expect("valid options");

        assert_eq!(parsed.user_id, Id::new(77));
        assert_eq!(parsed.forum, Forum::Appeals);
        assert_eq!(parsed.start_date.as_deref(), Some("2025-01-01"));
        assert_eq!(parsed.end_date, None);
    }

    #[test]
    fn unknown_channel_lists_allowed_choices() {
        let options = vec![
            option("user", CommandOptionValue::User(Id::new(77))),
            string("channel", "general"),
        ];

        let error = StatsOptions::from_options(&options).expect_err("invalid channel");

        assert_eq!(error, OptionError::InvalidChannel("general".to_owned()));
        assert!(error.to_string().contains("complaints, appeals"));
    }

    #[test]
    fn missing_required_options() {
        assert_eq!(
            StatsOptions::from_options(&[string("channel", "complaints")]),
            Err(OptionError::Missing("user"))
        );
        assert_eq!(
            StatsOptions::from_options(&[option("user", CommandOptionValue::User(Id::new(1)))]),
            Err(OptionError::Missing("channel"))
        );
    }
}
