pub mod options;
pub mod threads;

use twilight_model::{
    application::{
        command::Command,
        interaction::{InteractionData, application_command::CommandData},
    },
    gateway::payload::incoming::InteractionCreate,
};

use keeper_core::Context;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InteractionRoute {
    StatsButtons,
}

fn route_interaction(custom_id: &str) -> Option<InteractionRoute> {
    const ROUTES: [(&str, InteractionRoute); 1] = [("pg:stats:", InteractionRoute::StatsButtons)];

    ROUTES
        .into_iter()
        .find_map(|(prefix, route)| custom_id.starts_with(prefix).then_some(route))
}

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
}

/// Slash command definitions to register with Discord.
pub fn command_definitions() -> anyhow::Result<Vec<Command>> {
    let mut commands = threads::close::VARIANTS
        .iter()
        .map(|(meta, _)| threads::close::definition(meta))
        .collect::<anyhow::Result<Vec<_>>>()?;
    commands.push(threads::stats::definition()?);
    // Add new commands here

    Ok(commands)
}

pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let custom_id = match interaction.data.as_ref() {
        Some(InteractionData::ApplicationCommand(data)) => {
            return handle_command(ctx, &interaction, data).await;
        }
        Some(InteractionData::MessageComponent(data)) => data.custom_id.clone(),
        _ => return Ok(()),
    };

    let Some(route) = route_interaction(&custom_id) else {
        return Ok(());
    };

    match route {
        InteractionRoute::StatsButtons => {
            let _handled =
                threads::stats::handle_pagination_interaction(ctx.clone(), interaction).await?;
        }
    }

    Ok(())
}

async fn handle_command(
    ctx: Context,
    interaction: &InteractionCreate,
    data: &CommandData,
) -> anyhow::Result<()> {
    if let Some(expected) = threads::close::variant_for(&data.name) {
        return threads::close::run(ctx, interaction, expected).await;
    }

    if data.name == threads::stats::META.name {
        return threads::stats::run(ctx, interaction, data).await;
    }
    // Add new commands here

    Ok(())
}
