// Guild configuration commands. Guild-only, and the caller needs Manage Server.

use crate::core::dispatch::{CommandHandler, Invocation};
use crate::core::errors::CommandError;
use crate::core::games::Game;
use crate::core::guild_config::{GuildConfigService, GuildConfigStore};
use async_trait::async_trait;
use std::sync::Arc;

const MAX_LANGUAGE_LEN: usize = 10;

fn guild_id(invocation: &Invocation<'_>) -> Result<u64, CommandError> {
    invocation
        .context
        .message
        .guild_id
        .ok_or(CommandError::NoPrivateMessage)
}

fn required_arg<'a>(invocation: &'a Invocation<'_>, name: &str) -> Result<&'a str, CommandError> {
    invocation
        .arg(0)
        .ok_or_else(|| CommandError::MissingArgument(name.to_string()))
}

/// `prefix <new>`
pub struct PrefixCommand<S: GuildConfigStore> {
    guild_config: Arc<GuildConfigService<S>>,
}

impl<S: GuildConfigStore> PrefixCommand<S> {
    pub fn new(guild_config: Arc<GuildConfigService<S>>) -> Self {
        Self { guild_config }
    }
}

#[async_trait]
impl<S: GuildConfigStore + 'static> CommandHandler for PrefixCommand<S> {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        let guild_id = guild_id(&invocation)?;
        let prefix = required_arg(&invocation, "prefix")?;

        self.guild_config.set_prefix(guild_id, prefix).await?;
        tracing::info!(guild_id, prefix, "Guild prefix changed");

        invocation
            .reply(format!("Changed the prefix to: `{}`", prefix))
            .await
    }
}

/// `defaultgame <game>` - also retargets the dispatcher's rewrite in place.
pub struct DefaultGameCommand<S: GuildConfigStore> {
    guild_config: Arc<GuildConfigService<S>>,
}

impl<S: GuildConfigStore> DefaultGameCommand<S> {
    pub fn new(guild_config: Arc<GuildConfigService<S>>) -> Self {
        Self { guild_config }
    }
}

#[async_trait]
impl<S: GuildConfigStore + 'static> CommandHandler for DefaultGameCommand<S> {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        let guild_id = guild_id(&invocation)?;
        let game: Game = required_arg(&invocation, "game")?
            .parse()
            .map_err(|err: crate::core::games::UnknownGame| CommandError::BadArgument(err.0))?;

        self.guild_config.set_default_game(guild_id, game).await?;
        invocation.state.default_games.set(guild_id, game);
        tracing::info!(guild_id, game = game.key(), "Default game changed");

        invocation
            .reply(format!("Default game set to {}.", game))
            .await
    }
}

/// `language [tag]`. Without a tag, shows the language resolved for this
/// message.
pub struct LanguageCommand<S: GuildConfigStore> {
    guild_config: Arc<GuildConfigService<S>>,
}

impl<S: GuildConfigStore> LanguageCommand<S> {
    pub fn new(guild_config: Arc<GuildConfigService<S>>) -> Self {
        Self { guild_config }
    }
}

#[async_trait]
impl<S: GuildConfigStore + 'static> CommandHandler for LanguageCommand<S> {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        let guild_id = guild_id(&invocation)?;
        let Some(language) = invocation.arg(0) else {
            let current = format!("This server's language is `{}`.", invocation.context.language);
            return invocation.reply(current).await;
        };

        let valid = language.len() <= MAX_LANGUAGE_LEN
            && language
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CommandError::BadArgument(language.to_string()));
        }

        self.guild_config.set_language(guild_id, language).await?;
        invocation
            .reply(format!("Language set to `{}`.", language))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::test_support::{dm_message, guild_message, RecordingOutbox};
    use crate::core::dispatch::{BotState, DispatchContext, IncomingMessage, Reply};
    use crate::infra::guild_config::InMemoryGuildConfigStore;

    fn context(message: IncomingMessage, args: &[&str]) -> DispatchContext {
        DispatchContext {
            prefix: "!".into(),
            usage_prefix: "!".into(),
            invoked_with: "prefix".into(),
            command: None,
            args: args.iter().map(|a| a.to_string()).collect(),
            language: "messages".into(),
            content: message.content.clone(),
            message,
        }
    }

    fn service() -> Arc<GuildConfigService<InMemoryGuildConfigStore>> {
        Arc::new(GuildConfigService::new(InMemoryGuildConfigStore::new()))
    }

    #[tokio::test]
    async fn test_prefix_is_saved() {
        let config = service();
        let state = BotState::new([]);
        let outbox = RecordingOutbox::new();
        let ctx = context(guild_message("!prefix ?"), &["?"]);

        PrefixCommand::new(config.clone())
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap();

        let saved = config.get(300).await.unwrap().unwrap();
        assert_eq!(saved.prefix.as_deref(), Some("?"));
    }

    #[tokio::test]
    async fn test_prefix_needs_an_argument_and_a_guild() {
        let state = BotState::new([]);
        let outbox = RecordingOutbox::new();

        let ctx = context(guild_message("!prefix"), &[]);
        let err = PrefixCommand::new(service())
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument(_)));

        let ctx = context(dm_message("!prefix ?"), &["?"]);
        let err = PrefixCommand::new(service())
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::NoPrivateMessage));
    }

    #[tokio::test]
    async fn test_default_game_updates_router_in_place() {
        let config = service();
        let state = BotState::new([]);
        let outbox = RecordingOutbox::new();
        let ctx = context(guild_message("!defaultgame coc"), &["coc"]);

        DefaultGameCommand::new(config.clone())
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap();

        assert_eq!(state.default_games.alias_for(300), "coc");
        let saved = config.get(300).await.unwrap().unwrap();
        assert_eq!(saved.default_game.as_deref(), Some("Clash_Of_Clans"));
    }

    #[tokio::test]
    async fn test_unknown_game_is_bad_argument() {
        let state = BotState::new([]);
        let outbox = RecordingOutbox::new();
        let ctx = context(guild_message("!defaultgame chess"), &["chess"]);

        let err = DefaultGameCommand::new(service())
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::BadArgument(_)));
        assert_eq!(state.default_games.alias_for(300), "cr");
    }

    #[tokio::test]
    async fn test_language() {
        let config = service();
        let state = BotState::new([]);
        let outbox = RecordingOutbox::new();

        let ctx = context(guild_message("!language es"), &["es"]);
        LanguageCommand::new(config.clone())
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap();
        assert_eq!(
            config.get(300).await.unwrap().unwrap().language.as_deref(),
            Some("es")
        );

        let ctx = context(guild_message("!language ../etc"), &["../etc"]);
        let err = LanguageCommand::new(config)
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::BadArgument(_)));
    }

    #[tokio::test]
    async fn test_language_without_argument_shows_current() {
        let config = service();
        let state = BotState::new([]);
        let outbox = RecordingOutbox::new();
        let mut ctx = context(guild_message("!language"), &[]);
        ctx.language = "fr".into();

        LanguageCommand::new(config.clone())
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap();

        assert_eq!(
            outbox.sent(),
            vec![(200, Reply::Text("This server's language is `fr`.".into()))]
        );
        assert!(config.get(300).await.unwrap().is_none());
    }
}
