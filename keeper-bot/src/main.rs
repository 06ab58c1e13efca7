use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::{
    gateway::event::Event,
    id::{
        Id,
        marker::{ApplicationMarker, GuildMarker},
    },
};

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use keeper_commands::{command_definitions, handle_interaction};
use keeper_core::{Config, Context};
use keeper_database::{ClosureLedger, Database, MemoryLedger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.discord_token.clone()));
    let ledger = connect_ledger(&config).await?;
    let token = config.discord_token.clone();
    let guild_id = config.guild_id;
    let ctx = Context::new(Arc::clone(&http), ledger, config);

    // Slash commands only need guild metadata, no message content
    let intents = Intents::GUILDS;
    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!("Keeper is connecting...");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(ready) => {
                info!(user = %ready.user.name, "Keeper has successfully awoken!");

                if let Err(source) =
                    register_commands(&http, ready.application.id, guild_id).await
                {
                    error!(?source, "failed to register slash commands");
                }
            }
            Event::InteractionCreate(interaction) => {
                let ctx = ctx.clone();
                tokio::spawn(async move {
                    if let Err(source) = handle_interaction(ctx, interaction).await {
                        error!(?source, "interaction handler failed");
                    }
                });
            }
            _ => {} // Ignore unused events
        }
    }

    Ok(())
}

/// Postgres when `DATABASE_URL` is set, otherwise an in-process ledger.
async fn connect_ledger(config: &Config) -> anyhow::Result<Arc<dyn ClosureLedger>> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL not set; closures are kept in memory and lost on restart");
        return Ok(Arc::new(MemoryLedger::new()));
    };

    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(database_url)
        .await?;
    info!("PostgreSQL connection established.");

    let db = Database::new(db_pool);
    db.migrate().await?;
    info!("Database migrations applied.");

    Ok(Arc::new(db))
}

async fn register_commands(
    http: &Client,
    application_id: Id<ApplicationMarker>,
    guild_id: Option<Id<GuildMarker>>,
) -> anyhow::Result<()> {
    let commands = command_definitions()?;
    let interactions = http.interaction(application_id);

    match guild_id {
        Some(guild_id) => {
            interactions
                .set_guild_commands(guild_id, &commands)
                .await?;
            info!(
                guild_id = guild_id.get(),
                count = commands.len(),
                "guild commands registered"
            );
        }
        None => {
            interactions.set_global_commands(&commands).await?;
            info!(count = commands.len(), "global commands registered");
        }
    }

    Ok(())
}
