// JSON-file guild configuration store.
//
// Guild documents are cached in memory and written back on every save. The
// blacklist document is re-read from disk on every load so operators can edit
// it by hand and pick it up with `reloadblacklist`.

use crate::core::dispatch::BlacklistSet;
use crate::core::guild_config::{ConfigStoreError, GuildConfig, GuildConfigStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub struct JsonGuildConfigStore {
    guilds_path: PathBuf,
    blacklist_path: PathBuf,
    cache: RwLock<HashMap<String, GuildConfig>>,
}

impl JsonGuildConfigStore {
    pub fn new(
        guilds_path: impl Into<PathBuf>,
        blacklist_path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigStoreError> {
        let guilds_path = guilds_path.into();
        let cache = if guilds_path.exists() {
            let file = std::fs::File::open(&guilds_path)?;
            serde_json::from_reader(file)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            guilds_path,
            blacklist_path: blacklist_path.into(),
            cache: RwLock::new(cache),
        })
    }

    async fn persist(&self) -> Result<(), ConfigStoreError> {
        let cache = self.cache.read().await;
        if let Some(parent) = self.guilds_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&self.guilds_path)?;
        serde_json::to_writer_pretty(file, &*cache)?;
        Ok(())
    }
}

fn read_blacklist(path: &Path) -> Result<BlacklistSet, ConfigStoreError> {
    if !path.exists() {
        return Ok(BlacklistSet::default());
    }
    let file = std::fs::File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

#[async_trait]
impl GuildConfigStore for JsonGuildConfigStore {
    async fn get_config(&self, guild_id: u64) -> Result<Option<GuildConfig>, ConfigStoreError> {
        let cache = self.cache.read().await;
        Ok(cache.get(&guild_id.to_string()).cloned())
    }

    async fn save_config(&self, config: GuildConfig) -> Result<(), ConfigStoreError> {
        let mut cache = self.cache.write().await;
        cache.insert(config.guild_id.clone(), config);
        drop(cache);
        self.persist().await
    }

    async fn all_configs(&self) -> Result<Vec<GuildConfig>, ConfigStoreError> {
        let cache = self.cache.read().await;
        Ok(cache.values().cloned().collect())
    }

    async fn get_blacklist(&self) -> Result<BlacklistSet, ConfigStoreError> {
        read_blacklist(&self.blacklist_path)
    }
}
