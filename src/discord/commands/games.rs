// Per-game command family: `{alias}save` and `{alias}profile`.

use crate::core::dispatch::{CommandHandler, EmbedReply, Invocation};
use crate::core::errors::{random_color, CommandError};
use crate::core::games::{Game, TagService, TagStore};
use async_trait::async_trait;
use std::sync::Arc;

/// `{alias}save <tag>` - remember the caller's player tag.
pub struct SaveTagCommand<S: TagStore> {
    game: Game,
    tags: Arc<TagService<S>>,
}

impl<S: TagStore> SaveTagCommand<S> {
    pub fn new(game: Game, tags: Arc<TagService<S>>) -> Self {
        Self { game, tags }
    }
}

#[async_trait]
impl<S: TagStore + 'static> CommandHandler for SaveTagCommand<S> {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        let raw = invocation
            .arg(0)
            .ok_or_else(|| CommandError::MissingArgument("tag".to_string()))?;

        let user_id = invocation.context.message.author_id;
        let tag = self.tags.save(user_id, self.game, raw).await?;
        tracing::debug!(user_id, game = %self.game, tag = %tag, "Saved player tag");

        invocation
            .reply(format!("Your {} tag has been saved: #{}", self.game, tag))
            .await
    }
}

/// `{alias}profile [tag]` - link to a player's public profile.
pub struct ProfileCommand<S: TagStore> {
    game: Game,
    tags: Arc<TagService<S>>,
}

impl<S: TagStore> ProfileCommand<S> {
    pub fn new(game: Game, tags: Arc<TagService<S>>) -> Self {
        Self { game, tags }
    }
}

#[async_trait]
impl<S: TagStore + 'static> CommandHandler for ProfileCommand<S> {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        let user_id = invocation.context.message.author_id;
        let Some(tag) = self
            .tags
            .resolve(user_id, self.game, invocation.arg(0))
            .await?
        else {
            invocation
                .reply(format!(
                    "You don't have a saved tag. Save one using `{}{}save <tag>`!",
                    invocation.context.usage_prefix,
                    self.game.alias()
                ))
                .await?;
            return Err(CommandError::NoTag);
        };

        let embed = EmbedReply::new()
            .title(format!("{} profile", self.game))
            .description(format!("#{}", tag))
            .url(self.game.profile_url(&tag))
            .color(random_color());

        invocation.reply(embed).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::test_support::{guild_message, RecordingOutbox};
    use crate::core::dispatch::{BotState, DispatchContext, Reply};
    use crate::infra::tags::SqliteTagStore;

    fn context(content: &str, args: &[&str]) -> DispatchContext {
        DispatchContext {
            prefix: "!".into(),
            usage_prefix: "!".into(),
            invoked_with: "crprofile".into(),
            command: None,
            args: args.iter().map(|a| a.to_string()).collect(),
            language: "messages".into(),
            content: content.into(),
            message: guild_message(content),
        }
    }

    async fn tags() -> Arc<TagService<SqliteTagStore>> {
        Arc::new(TagService::new(
            SqliteTagStore::new("sqlite::memory:").await.unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_save_then_profile() {
        let tags = tags().await;
        let state = BotState::new([]);
        let outbox = RecordingOutbox::new();

        let ctx = context("!crsave #2pp", &["#2pp"]);
        SaveTagCommand::new(Game::ClashRoyale, tags.clone())
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap();

        let ctx = context("!crprofile", &[]);
        ProfileCommand::new(Game::ClashRoyale, tags)
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap();

        let sent = outbox.sent();
        assert_eq!(
            sent[0].1,
            Reply::Text("Your Clash Royale tag has been saved: #2PP".into())
        );
        match &sent[1].1 {
            Reply::Embed(embed) => {
                assert_eq!(embed.description.as_deref(), Some("#2PP"));
                assert_eq!(
                    embed.url.as_deref(),
                    Some("https://royaleapi.com/player/2PP")
                );
            }
            other => panic!("expected embed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_profile_without_saved_tag() {
        let state = BotState::new([]);
        let outbox = RecordingOutbox::new();
        let ctx = context("!bsprofile", &[]);

        let err = ProfileCommand::new(Game::BrawlStars, tags().await)
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::NoTag));
        assert_eq!(
            outbox.sent()[0].1,
            Reply::Text("You don't have a saved tag. Save one using `!bssave <tag>`!".into())
        );
    }

    #[tokio::test]
    async fn test_save_validates_tags() {
        let state = BotState::new([]);
        let outbox = RecordingOutbox::new();
        let tags = tags().await;

        let ctx = context("!bssave nope", &["nope"]);
        let err = SaveTagCommand::new(Game::BrawlStars, tags.clone())
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidBsTag { .. }));

        let ctx = context("!cocsave", &[]);
        let err = SaveTagCommand::new(Game::ClashOfClans, tags)
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::MissingArgument(_)));
        assert!(outbox.sent().is_empty());
    }
}
