pub mod blacklist;
pub mod bot_state;
pub mod command_registry;
pub mod default_game_router;
pub mod dispatch_models;
pub mod dispatch_service;
pub mod outbound;
pub mod prefix_resolver;

#[cfg(test)]
pub mod test_support;

pub use blacklist::BlacklistSet;
pub use bot_state::BotState;
pub use command_registry::{
    bot_embed_links, manage_guild, operator_only, Command, CommandHandler, CommandRegistry,
    Invocation, RegistryError,
};
pub use dispatch_models::{ChannelKind, DispatchContext, EmbedReply, IncomingMessage, Reply};
pub use dispatch_service::DispatchService;
pub use outbound::{
    CommandEvent, OperatorReport, Outbox, PasteError, PasteService, SendError, Telemetry,
};
pub use prefix_resolver::{PrefixResolver, DEFAULT_PREFIX};
