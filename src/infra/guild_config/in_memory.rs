// In-memory guild configuration store, used by tests and for quick local runs.

use crate::core::dispatch::BlacklistSet;
use crate::core::guild_config::{ConfigStoreError, GuildConfig, GuildConfigStore};
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

/// Guild documents keyed by their textual guild id.
#[derive(Default)]
pub struct InMemoryGuildConfigStore {
    configs: DashMap<String, GuildConfig>,
    blacklist: RwLock<BlacklistSet>,
}

impl InMemoryGuildConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_blacklist(&self, blacklist: BlacklistSet) {
        *self.blacklist.write().await = blacklist;
    }
}

#[async_trait]
impl GuildConfigStore for InMemoryGuildConfigStore {
    async fn get_config(&self, guild_id: u64) -> Result<Option<GuildConfig>, ConfigStoreError> {
        Ok(self
            .configs
            .get(&guild_id.to_string())
            .map(|entry| entry.value().clone()))
    }

    async fn save_config(&self, config: GuildConfig) -> Result<(), ConfigStoreError> {
        self.configs.insert(config.guild_id.clone(), config);
        Ok(())
    }

    async fn all_configs(&self) -> Result<Vec<GuildConfig>, ConfigStoreError> {
        Ok(self
            .configs
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn get_blacklist(&self) -> Result<BlacklistSet, ConfigStoreError> {
        Ok(self.blacklist.read().await.clone())
    }
}
