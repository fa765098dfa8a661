// Discord layer - commands, gateway events and the outbox.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "events/event_handlers.rs"]
pub mod events;

#[path = "outbox/serenity_outbox.rs"]
pub mod outbox;

use crate::core::dispatch::DispatchService;
use crate::core::guild_config::GuildConfigService;
use crate::infra::guild_config::JsonGuildConfigStore;
use outbox::SerenityOutbox;
use poise::serenity_prelude as serenity;
use std::sync::Arc;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Shared with every gateway event.
pub struct Data {
    pub dispatch: Arc<DispatchService<JsonGuildConfigStore>>,
    pub guild_config: Arc<GuildConfigService<JsonGuildConfigStore>>,
    /// Channel receiving crash reports.
    pub operator_channel: Option<u64>,
}

impl Data {
    pub fn outbox(&self, ctx: &serenity::Context) -> SerenityOutbox {
        SerenityOutbox::new(Arc::clone(&ctx.http), self.operator_channel)
    }
}
