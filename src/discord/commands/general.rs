// General commands available everywhere.

use crate::core::dispatch::{CommandHandler, EmbedReply, Invocation, SendError};
use crate::core::errors::CommandError;
use async_trait::async_trait;

const PING_TITLE: &str = "Pong! Websocket Latency:";
const PING_COLOR: u32 = 0xF9C93D;
const STATS_COLOR: u32 = 0x3498DB;

/// Pong! Returns the gateway latency.
pub struct PingCommand;

#[async_trait]
impl CommandHandler for PingCommand {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        let latency = match invocation.outbox.gateway_latency() {
            Some(latency) => format!("{:.4} ms", latency.as_secs_f64() * 1000.0),
            None => "unknown".to_string(),
        };

        let embed = EmbedReply::new()
            .title(PING_TITLE)
            .description(latency.clone())
            .color(PING_COLOR);

        // Channels without Embed Links still get the plain text version
        match invocation
            .outbox
            .send(invocation.context.message.channel_id, embed.into())
            .await
        {
            Ok(()) => Ok(()),
            Err(SendError::Forbidden) => {
                invocation
                    .reply(format!("{} {}", PING_TITLE, latency))
                    .await
            }
            Err(err) => Err(CommandError::Unexpected(anyhow::Error::new(err))),
        }
    }
}

pub struct StatsCommand;

#[async_trait]
impl CommandHandler for StatsCommand {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        let embed = EmbedReply::new()
            .title("Statsy")
            .color(STATS_COLOR)
            .field("Uptime", format_uptime(invocation.state.uptime()), true)
            .field(
                "Messages seen",
                invocation.state.messages_seen().to_string(),
                true,
            );

        invocation.reply(embed).await
    }
}

fn format_uptime(uptime: chrono::Duration) -> String {
    let secs = uptime.num_seconds().max(0);
    let (days, rem) = (secs / 86_400, secs % 86_400);
    let (hours, rem) = (rem / 3_600, rem % 3_600);
    let (minutes, seconds) = (rem / 60, rem % 60);

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else {
        format!("{}h {}m {}s", hours, minutes, seconds)
    }
}
