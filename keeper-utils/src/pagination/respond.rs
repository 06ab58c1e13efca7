//! Discord-facing side of pagination: sending, navigating, expiring, dismissing.

use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};
use twilight_http::Client;
use twilight_model::{
    application::interaction::InteractionData,
    gateway::payload::incoming::InteractionCreate,
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};

use super::session::{NavigationError, NavigationOutcome, PaginationRegistry, PaginationSession};
use super::token::{TokenError, custom_id_prefix, validate_custom_id};
use crate::channels::is_not_found;
use crate::interaction::{
    defer_component_update, respond_embed_with_components, respond_ephemeral_message,
    respond_update_message,
};

/// Generic message shown when a pagination interaction belongs to another user.
pub const PAGINATION_WRONG_USER_MESSAGE: &str = "This pagination session belongs to another user.";
/// Generic message shown when a pagination interaction has expired.
pub const PAGINATION_EXPIRED_MESSAGE: &str =
    "This pagination session expired. Run the command again.";
/// Generic message shown when pagination interaction payload is invalid.
pub const PAGINATION_INVALID_MESSAGE: &str = "Invalid pagination interaction.";

/// Reply to a command with the first page and start the inactivity timer.
pub async fn send_paginated_response(
    http: Arc<Client>,
    registry: &PaginationRegistry,
    interaction: &InteractionCreate,
    session: PaginationSession,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let first_page = session.render();
    let message =
        respond_embed_with_components(&http, interaction, first_page.embed, first_page.components)
            .await?;

    debug!(
        message_id = message.id.get(),
        pages = session.cursor().total(),
        "pagination session opened"
    );

    registry.bind(message.id, message.channel_id, session).await;
    schedule_inactivity_timeout(http, registry.clone(), message.id, timeout_secs).await;

    Ok(())
}

/// Handle a control press on one of `command`'s paginated messages.
///
/// Returns `Ok(false)` when the interaction is not a pagination press for `command`.
pub async fn handle_navigation(
    http: Arc<Client>,
    registry: &PaginationRegistry,
    interaction: &InteractionCreate,
    command: &str,
    timeout_secs: u64,
) -> anyhow::Result<bool> {
    let Some(InteractionData::MessageComponent(component_data)) = interaction.data.as_ref() else {
        return Ok(false);
    };

    if !component_data
        .custom_id
        .starts_with(&custom_id_prefix(command))
    {
        return Ok(false);
    }

    let Some(actor_user_id) = interaction.author_id().map(|id| id.get()) else {
        respond_ephemeral_message(&http, interaction, "Unable to determine interaction user.")
            .await?;
        return Ok(true);
    };

    let token = match validate_custom_id(&component_data.custom_id, command, actor_user_id) {
        Ok(token) => token,
        Err(TokenError::WrongUser) => {
            respond_ephemeral_message(&http, interaction, PAGINATION_WRONG_USER_MESSAGE).await?;
            return Ok(true);
        }
        Err(_) => {
            respond_ephemeral_message(&http, interaction, PAGINATION_INVALID_MESSAGE).await?;
            return Ok(true);
        }
    };

    let Some(message) = interaction.message.as_ref() else {
        respond_ephemeral_message(&http, interaction, PAGINATION_INVALID_MESSAGE).await?;
        return Ok(true);
    };

    match registry.navigate(message.id, token.action).await {
        Ok(NavigationOutcome::Render(page)) => {
            respond_update_message(&http, interaction, &[page.embed], &page.components).await?;
            schedule_inactivity_timeout(
                Arc::clone(&http),
                registry.clone(),
                message.id,
                timeout_secs,
            )
            .await;
        }
        Ok(NavigationOutcome::Dismissed { channel_id }) => {
            defer_component_update(&http, interaction).await?;
            delete_bound_message(&http, channel_id, message.id).await?;
            debug!(message_id = message.id.get(), "pagination session dismissed");
        }
        Err(NavigationError::Expired | NavigationError::Transition(_)) => {
            respond_ephemeral_message(&http, interaction, PAGINATION_EXPIRED_MESSAGE).await?;
        }
    }

    Ok(true)
}

/// Delete a paginated message. Already deleted counts as success.
pub async fn delete_bound_message(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
) -> anyhow::Result<()> {
    match http.delete_message(channel_id, message_id).await {
        Ok(_) => Ok(()),
        Err(source) if is_not_found(&source) => {
            debug!(message_id = message_id.get(), "paginated message already deleted");
            Ok(())
        }
        Err(source) => Err(source.into()),
    }
}

/// (Re)start the inactivity timer for a session.
///
/// When it fires, the session is frozen and the message is edited to show
/// every control disabled on the current page.
pub async fn schedule_inactivity_timeout(
    http: Arc<Client>,
    registry: PaginationRegistry,
    message_id: Id<MessageMarker>,
    timeout_secs: u64,
) {
    let timer_registry = registry.clone();
    let expiry = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(timeout_secs)).await;

        let Some((channel_id, page)) = timer_registry.freeze(message_id).await else {
            return;
        };

        let result = http
            .update_message(channel_id, message_id)
            .components(Some(page.components.as_slice()))
            .await;

        match result {
            Ok(_) => debug!(message_id = message_id.get(), "pagination session timed out"),
            Err(source) if is_not_found(&source) => {
                debug!(message_id = message_id.get(), "timed out message already deleted");
            }
            Err(source) => warn!(
                ?source,
                message_id = message_id.get(),
                "failed to disable pagination controls"
            ),
        }
    });

    registry.set_expiry(message_id, expiry).await;
}
