// Outbound ports used by the dispatcher.
//
// The core says WHAT it needs to send (replies, operator reports, telemetry,
// paste uploads); the Discord and infra layers decide HOW.

use super::dispatch_models::{DispatchContext, Reply};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// CHAT OUTBOX
// ============================================================================

#[derive(Debug, Error)]
pub enum SendError {
    /// The bot is not allowed to post there.
    #[error("Missing permissions to send")]
    Forbidden,

    #[error("No operator channel configured")]
    NoOperatorChannel,

    #[error("Send failed: {0}")]
    Other(String),
}

/// Crash report for the operator channel. `body` is already either inline
/// text or a paste link.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorReport {
    pub title: String,
    pub body: String,
    pub footer: Option<String>,
    pub color: u32,
}

#[async_trait]
pub trait Outbox: Send + Sync {
    /// Send a reply to a chat channel.
    async fn send(&self, channel_id: u64, reply: Reply) -> Result<(), SendError>;

    /// Deliver a crash report to the operator-only channel.
    async fn send_operator_report(&self, report: OperatorReport) -> Result<(), SendError>;

    /// Gateway heartbeat latency of the shard that received the message.
    fn gateway_latency(&self) -> Option<Duration> {
        None
    }
}

// ============================================================================
// TELEMETRY
// ============================================================================

/// Emitted once per invocation of a non-hidden command.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandEvent {
    pub command: String,
    pub user_id: u64,
    /// Guild id or the DM sentinel.
    pub guild: String,
    pub prefix_fingerprint: String,
    pub channel_type: &'static str,
}

impl CommandEvent {
    pub fn from_context(ctx: &DispatchContext) -> Self {
        Self {
            command: ctx.command_name().to_string(),
            user_id: ctx.message.author_id,
            guild: ctx.message.guild_label(),
            prefix_fingerprint: prefix_fingerprint(&ctx.prefix),
            channel_type: ctx.message.channel_kind.as_str(),
        }
    }
}

/// Character codes of the prefix joined by `|`, so `"!"` becomes `"33"`.
///
/// Raw prefixes can contain mentions and arbitrary user text, which we don't
/// want to ship as a metric tag.
pub fn prefix_fingerprint(prefix: &str) -> String {
    prefix
        .chars()
        .map(|c| (c as u32).to_string())
        .collect::<Vec<_>>()
        .join("|")
}

pub trait Telemetry: Send + Sync {
    fn command_invoked(&self, event: &CommandEvent);
}

// ============================================================================
// PASTE SERVICE
// ============================================================================

#[derive(Debug, Error)]
pub enum PasteError {
    #[error("Paste request failed: {0}")]
    Request(String),

    #[error("Paste service returned an unexpected response: {0}")]
    BadResponse(String),
}

#[async_trait]
pub trait PasteService: Send + Sync {
    /// Upload raw text and return a link to it.
    async fn upload(&self, text: &str) -> Result<String, PasteError>;
}
