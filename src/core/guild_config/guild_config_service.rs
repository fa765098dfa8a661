// Per-guild configuration consumed by the dispatcher.
//
// Only the fields the dispatch core reads are modelled here: prefix,
// language and default game. The singleton blacklist document lives next to
// it in the same store.

use crate::core::dispatch::BlacklistSet;
use crate::core::errors::CommandError;
use crate::core::games::Game;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// MODELS
// ============================================================================

/// One persisted guild document. `guild_id` is kept as text, like the ids in
/// the blacklist document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuildConfig {
    pub guild_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Game key, e.g. `Clash_Royale`. Kept as text so a document with an
    /// unknown game still loads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_game: Option<String>,
}

impl GuildConfig {
    pub fn new(guild_id: u64) -> Self {
        Self {
            guild_id: guild_id.to_string(),
            ..Default::default()
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid prefix: {0}")]
    InvalidPrefix(String),
}

impl From<ConfigStoreError> for CommandError {
    fn from(err: ConfigStoreError) -> Self {
        match err {
            ConfigStoreError::InvalidPrefix(prefix) => CommandError::BadArgument(prefix),
            other => CommandError::Unexpected(anyhow::Error::new(other)),
        }
    }
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

#[async_trait]
pub trait GuildConfigStore: Send + Sync {
    async fn get_config(&self, guild_id: u64) -> Result<Option<GuildConfig>, ConfigStoreError>;
    async fn save_config(&self, config: GuildConfig) -> Result<(), ConfigStoreError>;
    async fn all_configs(&self) -> Result<Vec<GuildConfig>, ConfigStoreError>;
    async fn get_blacklist(&self) -> Result<BlacklistSet, ConfigStoreError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

/// Longest prefix a guild may configure.
const MAX_PREFIX_LEN: usize = 10;

pub struct GuildConfigService<S: GuildConfigStore> {
    store: S,
}

impl<S: GuildConfigStore> GuildConfigService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get(&self, guild_id: u64) -> Result<Option<GuildConfig>, ConfigStoreError> {
        self.store.get_config(guild_id).await
    }

    async fn update(
        &self,
        guild_id: u64,
        apply: impl FnOnce(&mut GuildConfig),
    ) -> Result<(), ConfigStoreError> {
        let mut config = self
            .store
            .get_config(guild_id)
            .await?
            .unwrap_or_else(|| GuildConfig::new(guild_id));
        apply(&mut config);
        self.store.save_config(config).await
    }

    pub async fn set_prefix(&self, guild_id: u64, prefix: &str) -> Result<(), ConfigStoreError> {
        if prefix.is_empty()
            || prefix.chars().count() > MAX_PREFIX_LEN
            || prefix.contains(char::is_whitespace)
        {
            return Err(ConfigStoreError::InvalidPrefix(prefix.to_string()));
        }
        let prefix = prefix.to_string();
        self.update(guild_id, |config| config.prefix = Some(prefix))
            .await
    }

    pub async fn set_language(&self, guild_id: u64, language: &str) -> Result<(), ConfigStoreError> {
        let language = language.to_string();
        self.update(guild_id, |config| config.language = Some(language))
            .await
    }

    pub async fn set_default_game(&self, guild_id: u64, game: Game) -> Result<(), ConfigStoreError> {
        self.update(guild_id, |config| {
            config.default_game = Some(game.key().to_string())
        })
        .await
    }

    /// Every guild that picked a known default game.
    ///
    /// Documents with an unparsable id or unknown game are skipped with a warning.
    pub async fn default_game_bindings(&self) -> Result<Vec<(u64, Game)>, ConfigStoreError> {
        let configs = self.store.all_configs().await?;
        let mut bindings = Vec::new();

        for config in configs {
            let Some(key) = config.default_game.as_deref() else {
                continue;
            };
            match (config.guild_id.parse::<u64>(), key.parse::<Game>()) {
                (Ok(guild_id), Ok(game)) => bindings.push((guild_id, game)),
                _ => tracing::warn!(
                    guild_id = %config.guild_id,
                    default_game = %key,
                    "Skipping unusable default game binding"
                ),
            }
        }

        Ok(bindings)
    }

    pub async fn load_blacklist(&self) -> Result<BlacklistSet, ConfigStoreError> {
        self.store.get_blacklist().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::guild_config::InMemoryGuildConfigStore;

    #[tokio::test]
    async fn test_set_prefix_creates_document() {
        let service = GuildConfigService::new(InMemoryGuildConfigStore::new());
        service.set_prefix(5, "?").await.unwrap();

        let config = service.get(5).await.unwrap().unwrap();
        assert_eq!(config.guild_id, "5");
        assert_eq!(config.prefix.as_deref(), Some("?"));
        assert!(config.default_game.is_none());
    }

    #[tokio::test]
    async fn test_rejects_bad_prefixes() {
        let service = GuildConfigService::new(InMemoryGuildConfigStore::new());
        assert!(service.set_prefix(5, "").await.is_err());
        assert!(service.set_prefix(5, "a b").await.is_err());
        assert!(service.set_prefix(5, "waytoolongprefix").await.is_err());
        assert!(service.get(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_updates_keep_other_fields() {
        let service = GuildConfigService::new(InMemoryGuildConfigStore::new());
        service.set_prefix(5, "?").await.unwrap();
        service.set_default_game(5, Game::BrawlStars).await.unwrap();
        service.set_language(5, "fr").await.unwrap();

        let config = service.get(5).await.unwrap().unwrap();
        assert_eq!(config.prefix.as_deref(), Some("?"));
        assert_eq!(config.default_game.as_deref(), Some("Brawl_Stars"));
        assert_eq!(config.language.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_default_game_bindings_skip_bad_documents() {
        let store = InMemoryGuildConfigStore::new();
        store
            .save_config(GuildConfig {
                guild_id: "1".into(),
                default_game: Some("Clash_Of_Clans".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        store
            .save_config(GuildConfig {
                guild_id: "2".into(),
                default_game: Some("Pokemon".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        store.save_config(GuildConfig::new(3)).await.unwrap();

        let service = GuildConfigService::new(store);
        let bindings = service.default_game_bindings().await.unwrap();
        assert_eq!(bindings, vec![(1, Game::ClashOfClans)]);
    }
}
