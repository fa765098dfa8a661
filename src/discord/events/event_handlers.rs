// Gateway event glue: turns serenity events into dispatcher calls.

use crate::core::dispatch::{ChannelKind, IncomingMessage};
use crate::discord::{Data, Error};
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::time::Duration;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            let incoming = incoming_message(ctx, new_message);
            let latency = shard_latency(ctx, framework).await;
            let outbox = data.outbox(ctx).with_latency(latency);

            let outcome = data.dispatch.handle_message(incoming, &outbox).await;
            tracing::trace!(message_id = new_message.id.get(), ?outcome, "Message handled");
        }
        serenity::FullEvent::Resume { .. } => {
            tracing::info!("Gateway session resumed");
        }
        _ => {}
    }

    Ok(())
}

/// Load the blacklist and default-game bindings into the shared state.
///
/// Failures are reported to operators; the bot keeps running with whatever
/// it had before.
pub async fn load_shared_state(ctx: &serenity::Context, data: &Data) {
    if let Err(err) = try_load_shared_state(data).await {
        tracing::error!(error = ?err, "Failed to load shared state");
        data.dispatch
            .reporter()
            .report_event_error("on_connect", &err, &data.outbox(ctx))
            .await;
    }
}

async fn try_load_shared_state(data: &Data) -> anyhow::Result<()> {
    let state = data.dispatch.state();

    let blacklist = data
        .guild_config
        .load_blacklist()
        .await
        .context("loading blacklist")?;
    let blacklisted = blacklist.len();
    state.blacklist.replace(blacklist).await;

    let bindings = data
        .guild_config
        .default_game_bindings()
        .await
        .context("loading default games")?;
    let bound = bindings.len();
    state.default_games.seed(bindings);

    tracing::info!(blacklisted, default_games = bound, "Shared state loaded");
    Ok(())
}

async fn shard_latency(
    ctx: &serenity::Context,
    framework: poise::FrameworkContext<'_, Data, Error>,
) -> Option<Duration> {
    let runners = framework.shard_manager.runners.lock().await;
    runners.get(&ctx.shard_id).and_then(|runner| runner.latency)
}

/// Snapshot what the dispatcher needs from the message and the cache.
pub fn incoming_message(ctx: &serenity::Context, message: &serenity::Message) -> IncomingMessage {
    let bot_id = ctx.cache.current_user().id;

    let (channel_kind, can_manage, bot_can_embed) = match message.guild_id {
        None => (ChannelKind::Other, false, true),
        Some(guild_id) => match ctx.cache.guild(guild_id) {
            Some(guild) => {
                let channel = guild.channels.get(&message.channel_id);
                let kind = match channel {
                    Some(channel) => channel_kind(channel.kind),
                    None if guild.threads.iter().any(|t| t.id == message.channel_id) => {
                        ChannelKind::Other
                    }
                    None => ChannelKind::GuildText,
                };
                let roles = message
                    .member
                    .as_ref()
                    .map(|member| member.roles.as_slice())
                    .unwrap_or_default();
                let permissions = role_permissions(&guild, roles);

                // Unknown until the bot's own member is cached; assume allowed.
                let bot_permissions = guild.members.get(&bot_id).map(|bot| match channel {
                    Some(channel) => guild.user_permissions_in(channel, bot),
                    None => role_permissions(&guild, &bot.roles),
                });

                (
                    kind,
                    can_manage_guild(guild.owner_id == message.author.id, permissions),
                    bot_permissions.map_or(true, can_embed),
                )
            }
            None => (ChannelKind::GuildText, false, true),
        },
    };

    IncomingMessage {
        author_id: message.author.id.get(),
        author_is_bot: message.author.bot,
        author_can_manage_guild: can_manage,
        bot_can_embed,
        channel_id: message.channel_id.get(),
        channel_kind,
        guild_id: message.guild_id.map(|id| id.get()),
        content: message.content.clone(),
    }
}

fn channel_kind(kind: serenity::ChannelType) -> ChannelKind {
    match kind {
        serenity::ChannelType::Text | serenity::ChannelType::News => ChannelKind::GuildText,
        _ => ChannelKind::Other,
    }
}

/// Union of the @everyone role and the member's roles.
fn role_permissions(guild: &serenity::Guild, roles: &[serenity::RoleId]) -> serenity::Permissions {
    let everyone = serenity::RoleId::new(guild.id.get());
    std::iter::once(&everyone)
        .chain(roles.iter())
        .filter_map(|id| guild.roles.get(id))
        .fold(serenity::Permissions::empty(), |acc, role| {
            acc | role.permissions
        })
}

fn can_manage_guild(is_owner: bool, permissions: serenity::Permissions) -> bool {
    is_owner
        || permissions.contains(serenity::Permissions::ADMINISTRATOR)
        || permissions.contains(serenity::Permissions::MANAGE_GUILD)
}

fn can_embed(permissions: serenity::Permissions) -> bool {
    permissions.contains(serenity::Permissions::ADMINISTRATOR)
        || permissions.contains(serenity::Permissions::EMBED_LINKS)
}
