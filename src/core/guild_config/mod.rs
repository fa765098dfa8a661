pub mod guild_config_service;

pub use guild_config_service::{ConfigStoreError, GuildConfig, GuildConfigService, GuildConfigStore};
