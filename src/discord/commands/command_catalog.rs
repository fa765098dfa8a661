// Discord commands module.
// Each feature gets its own command file; `build_registry` is the single list
// of everything the dispatcher can run.

pub mod admin;
pub mod games;
pub mod general;
pub mod guild_settings;

use crate::core::dispatch::{
    bot_embed_links, manage_guild, operator_only, Command, CommandRegistry, RegistryError,
};
use crate::core::games::{Game, TagService, TagStore};
use crate::core::guild_config::{GuildConfigService, GuildConfigStore};
use std::sync::Arc;

pub fn build_registry<C, T>(
    guild_config: Arc<GuildConfigService<C>>,
    tags: Arc<TagService<T>>,
) -> Result<CommandRegistry, RegistryError>
where
    C: GuildConfigStore + 'static,
    T: TagStore + 'static,
{
    let mut registry = CommandRegistry::new();

    // General
    registry.register(
        Command::new("ping", general::PingCommand).help("Pong! Returns the websocket latency."),
    )?;
    registry.register(
        Command::new("stats", general::StatsCommand)
            .aliases(["uptime"])
            .help("Uptime and message counters.")
            .check(bot_embed_links),
    )?;

    // Operators
    registry.register(
        Command::new("maintenance", admin::MaintenanceCommand)
            .signature("[on|off]")
            .hidden()
            .check(operator_only),
    )?;
    registry.register(
        Command::new(
            "reloadblacklist",
            admin::ReloadBlacklistCommand::new(Arc::clone(&guild_config)),
        )
        .hidden()
        .check(operator_only),
    )?;
    registry.register(
        Command::new("restart", admin::RestartCommand::new(admin::exec_self))
            .hidden()
            .check(operator_only),
    )?;

    // Guild settings
    registry.register(
        Command::new(
            "prefix",
            guild_settings::PrefixCommand::new(Arc::clone(&guild_config)),
        )
        .signature("<prefix>")
        .help("Changes the bot prefix for this server.")
        .check(manage_guild),
    )?;
    registry.register(
        Command::new(
            "defaultgame",
            guild_settings::DefaultGameCommand::new(Arc::clone(&guild_config)),
        )
        .signature("<game>")
        .help("Sets the game used by commands without a game prefix.")
        .check(manage_guild),
    )?;
    registry.register(
        Command::new(
            "language",
            guild_settings::LanguageCommand::new(Arc::clone(&guild_config)),
        )
        .signature("[language]")
        .help("Changes the bot language for this server.")
        .check(manage_guild),
    )?;

    // One family per game
    for game in Game::ALL {
        let alias = game.alias();
        registry.register(
            Command::new(
                format!("{}save", alias),
                games::SaveTagCommand::new(game, Arc::clone(&tags)),
            )
            .signature("<tag>")
            .help(format!("Saves your {} tag.", game)),
        )?;
        registry.register(
            Command::new(
                format!("{}profile", alias),
                games::ProfileCommand::new(game, Arc::clone(&tags)),
            )
            .signature("[tag]")
            .help(format!("Links to a {} player profile.", game))
            .check(bot_embed_links),
        )?;
    }

    Ok(registry)
}
