// This is the entry point of Statsy.
//
// **Architecture Overview:**
// - `core/` = Business logic (dispatch, error taxonomy, games, guild config)
// - `infra/` = Implementations of core traits (JSON/SQLite stores, paste service, config)
// - `discord/` = Discord-specific adapters (commands, events, outbox)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Hand every gateway message to the dispatcher

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::dispatch::{BotState, DispatchService, PrefixResolver};
use crate::core::errors::ErrorReporter;
use crate::core::games::TagService;
use crate::core::guild_config::GuildConfigService;
use crate::discord::{Data, Error};
use crate::infra::config::BotConfig;
use crate::infra::guild_config::JsonGuildConfigStore;
use crate::infra::paste::HastebinClient;
use crate::infra::tags::SqliteTagStore;
use crate::infra::telemetry::TracingTelemetry;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = BotConfig::from_env().expect("Invalid bot configuration");
    if config.dev_mode {
        tracing::warn!("Development mode: using ./ prefix and printing error reports locally");
    }

    // Keep runtime data in a dedicated folder so the repo root stays tidy.
    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let guild_store = JsonGuildConfigStore::new(config.guilds_path(), config.blacklist_path())
        .expect("Failed to load guild configuration");
    let guild_config = Arc::new(GuildConfigService::new(guild_store));

    let tag_store = SqliteTagStore::new(&config.tags_db_path().to_string_lossy())
        .await
        .expect("Failed to initialize tag database");
    let tags = Arc::new(TagService::new(tag_store));

    let registry = discord::commands::build_registry(Arc::clone(&guild_config), tags)
        .expect("Command registration failed");
    tracing::info!(commands = registry.len(), "Commands registered");

    let paste = HastebinClient::new(config.paste_url.clone()).expect("Failed to create paste client");
    let reporter = ErrorReporter::new(Arc::new(paste), config.dev_mode);
    let state = Arc::new(BotState::new(config.operators.iter().copied()));

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================
    // Commands are parsed by our own dispatcher, so poise gets an empty
    // command list and only forwards events.

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILDS;

    let setup_config = config.clone();
    let framework = poise::Framework::<Data, Error>::builder()
        .options(poise::FrameworkOptions {
            commands: vec![],
            event_handler: |ctx, event, framework, data| {
                Box::pin(discord::events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, _framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "Bot is starting up...");

                let resolver = PrefixResolver::new(
                    ready.user.id.get(),
                    setup_config.default_prefix.clone(),
                    setup_config.dev_mode,
                );
                let dispatch = DispatchService::new(
                    resolver,
                    registry,
                    state,
                    Arc::clone(&guild_config),
                    reporter,
                    Arc::new(TracingTelemetry),
                    setup_config.handler_timeout,
                );

                let data = Data {
                    dispatch: Arc::new(dispatch),
                    guild_config,
                    operator_channel: setup_config.error_channel_id,
                };
                discord::events::load_shared_state(ctx, &data).await;

                tracing::info!("Bot is ready!");
                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .expect("Error creating client");

    client.start().await.expect("Error running bot");
}
