use twilight_http::Client;
use twilight_model::{
    channel::{
        Message,
        message::{MessageFlags, component::Component, embed::Embed},
    },
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseType},
};
use twilight_util::builder::InteractionResponseDataBuilder;

async fn create_response(
    http: &Client,
    interaction: &InteractionCreate,
    response: &InteractionResponse,
) -> anyhow::Result<()> {
    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, response)
        .await?;

    Ok(())
}

/// Reply with a message only the invoking user can see.
pub async fn respond_ephemeral_message(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };

    create_response(http, interaction, &response).await
}

/// Reply with a plain message visible to the whole channel.
pub async fn respond_public_message(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(InteractionResponseDataBuilder::new().content(content).build()),
    };

    create_response(http, interaction, &response).await
}

/// Reply with an embed and interactive components, then fetch the created message.
///
/// The returned message is what later component presses and edits refer to.
pub async fn respond_embed_with_components(
    http: &Client,
    interaction: &InteractionCreate,
    embed: Embed,
    components: Vec<Component>,
) -> anyhow::Result<Message> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .embeds(vec![embed])
                .components(components)
                .build(),
        ),
    };

    create_response(http, interaction, &response).await?;

    let message = http
        .interaction(interaction.application_id)
        .response(&interaction.token)
        .await?
        .model()
        .await?;

    Ok(message)
}

/// Respond to a component interaction with an in-place message update.
pub async fn respond_update_message(
    http: &Client,
    interaction: &InteractionCreate,
    embeds: &[Embed],
    components: &[Component],
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .embeds(embeds.to_vec())
                .components(components.to_vec())
                .build(),
        ),
    };

    create_response(http, interaction, &response).await
}

/// Acknowledge a component interaction without changing the message yet.
pub async fn defer_component_update(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::DeferredUpdateMessage,
        data: None,
    };

    create_response(http, interaction, &response).await
}
