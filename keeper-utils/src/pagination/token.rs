//! Pagination custom ID encoding, parsing, and validation.

use super::view::NavAction;

const TOKEN_PREFIX: &str = "pg";

/// Parsed pagination data from a button custom ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationToken {
    /// Logical command name (e.g. `stats`).
    pub command: String,
    pub action: NavAction,
    /// User ID that owns this pagination session.
    pub user_id: u64,
}

/// Validation outcome for pagination button presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed pagination custom id")]
    Invalid,
    #[error("pagination custom id belongs to another command")]
    WrongCommand,
    #[error("pagination session belongs to another user")]
    WrongUser,
}

/// Prefix shared by every button of a command's paginated views.
pub fn custom_id_prefix(command: &str) -> String {
    format!("{TOKEN_PREFIX}:{command}:")
}

/// Build the custom ID for one control.
pub fn build_custom_id(command: &str, action: NavAction, user_id: u64) -> String {
    format!(
        "{TOKEN_PREFIX}:{command}:{action}:{user_id}",
        action = action.as_str()
    )
}

/// Parse a pagination custom ID.
pub fn parse_custom_id(custom_id: &str) -> Option<PaginationToken> {
    let mut parts = custom_id.split(':');

    if parts.next()? != TOKEN_PREFIX {
        return None;
    }

    let command = parts.next()?.to_owned();
    let action = NavAction::parse(parts.next()?)?;
    let user_id = parts.next()?.parse::<u64>().ok()?;

    if parts.next().is_some() {
        return None;
    }

    Some(PaginationToken {
        command,
        action,
        user_id,
    })
}

/// Validate a pagination custom ID for the expected command and acting user.
pub fn validate_custom_id(
    custom_id: &str,
    expected_command: &str,
    actor_user_id: u64,
) -> Result<PaginationToken, TokenError> {
    let token = parse_custom_id(custom_id).ok_or(TokenError::Invalid)?;

    if token.command != expected_command {
        return Err(TokenError::WrongCommand);
    }

    if token.user_id != actor_user_id {
        return Err(TokenError::WrongUser);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_ids_share_the_command_prefix() {
        let id = build_custom_id("stats", NavAction::Last, 42);

        assert_eq!(id, "pg:stats:last:42");
        assert!(id.starts_with(&custom_id_prefix("stats")));
    }

    #[test]
    fn validates_owner_and_command() {
        let id = build_custom_id("stats", NavAction::Next, 42);

        let token = validate_custom_id(&id, "stats", 42).expect("owner press");
        assert_eq!(token.action, NavAction::Next);

        assert_eq!(
            validate_custom_id(&id, "stats", 7),
            Err(TokenError::WrongUser)
        );
        assert_eq!(
            validate_custom_id(&id, "help", 42),
            Err(TokenError::WrongCommand)
        );
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in [
            "",
            "pg:stats",
            "pg:stats:jump:42",
            "pg:stats:next:abc",
            "pg:stats:next:42:extra",
            "pgm:stats:next:42",
        ] {
            assert_eq!(
                validate_custom_id(raw, "stats", 42),
                Err(TokenError::Invalid),
                "{raw:?}"
            );
        }
    }
}
