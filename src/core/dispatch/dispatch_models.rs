// Dispatch domain models.
//
// These are pure types with no Discord dependencies. The Discord layer builds
// an `IncomingMessage` from a gateway message and turns `Reply` values back
// into serenity builders.

use super::command_registry::Command;
use crate::core::errors::ErrorCategory;
use std::sync::Arc;

/// Language tag used when a guild never configured one.
pub const DEFAULT_LANGUAGE: &str = "messages";

/// Guild id placeholder used in telemetry and report footers for DMs.
pub const DM_SENTINEL: &str = "DM";

/// Where a message was sent from, as far as routing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    /// A text (or news) channel inside a guild.
    GuildText,
    /// DMs, group DMs, threads and anything else.
    Other,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::GuildText => "TextChannel",
            ChannelKind::Other => "Other",
        }
    }
}

/// A single inbound chat message.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub author_id: u64,
    pub author_is_bot: bool,
    /// Guild owner, administrator or holder of Manage Server.
    pub author_can_manage_guild: bool,
    /// Whether the bot may post embeds in this channel.
    pub bot_can_embed: bool,
    pub channel_id: u64,
    pub channel_kind: ChannelKind,
    /// `None` for direct messages.
    pub guild_id: Option<u64>,
    pub content: String,
}

impl IncomingMessage {
    /// The guild id as text, or the DM sentinel.
    pub fn guild_label(&self) -> String {
        self.guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| DM_SENTINEL.to_string())
    }

    /// Id used to look up the default game: the guild in guild text
    /// channels, the channel itself everywhere else.
    pub fn routing_id(&self) -> u64 {
        match (self.channel_kind, self.guild_id) {
            (ChannelKind::GuildText, Some(guild_id)) => guild_id,
            _ => self.channel_id,
        }
    }
}

/// Per-invocation record. Built fresh for each message and dropped after.
#[derive(Clone)]
pub struct DispatchContext {
    /// The prefix that matched on the pass that found the command.
    pub prefix: String,
    /// Prefix shown in usage hints (the third candidate slot).
    pub usage_prefix: String,
    pub invoked_with: String,
    pub command: Option<Arc<Command>>,
    pub args: Vec<String>,
    pub language: String,
    /// Content the command was resolved from (rewritten on the second pass).
    pub content: String,
    pub message: IncomingMessage,
}

impl DispatchContext {
    pub fn command_name(&self) -> &str {
        self.command
            .as_ref()
            .map(|command| command.name.as_str())
            .unwrap_or(self.invoked_with.as_str())
    }
}

/// Outbound message body, independent of any chat SDK.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Embed(EmbedReply),
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

impl From<String> for Reply {
    fn from(text: String) -> Self {
        Reply::Text(text)
    }
}

impl From<EmbedReply> for Reply {
    fn from(embed: EmbedReply) -> Self {
        Reply::Embed(embed)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmbedReply {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: u32,
    pub image: Option<String>,
    pub url: Option<String>,
    pub fields: Vec<(String, String, bool)>,
}

impl EmbedReply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push((name.into(), value.into(), inline));
        self
    }
}

/// How a single message ended up being handled.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Sent by a bot; counted but never dispatched.
    BotAuthor,
    /// Plain chat, no prefix matched.
    NoPrefix,
    /// Neither the word nor its default-game rewrite named a command.
    NotFound,
    Blacklisted,
    /// Maintenance notice was sent instead of running the command.
    Maintenance,
    Invoked { command: String, rewritten: bool },
    Failed {
        command: String,
        rewritten: bool,
        category: ErrorCategory,
    },
}
