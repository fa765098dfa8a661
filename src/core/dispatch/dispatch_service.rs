// Dispatch service - turns a raw chat message into (at most) one command run.
//
// A message goes through at most two passes:
//
//   RECEIVED -> PREFIX_MATCHED (or NO_MATCH) -> WORD_EXTRACTED
//            -> COMMAND_FOUND
//            |  COMMAND_NOT_FOUND -> REWRITTEN -> WORD_EXTRACTED
//                                 -> COMMAND_FOUND | STILL_NOT_FOUND
//
// The rewrite prepends the default-game alias to the invocation word, so
// `!profile ABC` in a Clash Royale guild becomes `!crprofile ABC`. There is
// never a third pass.
//
// NO Discord dependencies here; replies go through the `Outbox` port.

use super::bot_state::BotState;
use super::command_registry::{Command, CommandRegistry, Invocation};
use super::dispatch_models::{
    ChannelKind, DispatchContext, DispatchOutcome, IncomingMessage, DEFAULT_LANGUAGE,
};
use super::outbound::{CommandEvent, Outbox, Telemetry};
use super::prefix_resolver::{match_prefix, usage_prefix, PrefixResolver};
use crate::core::errors::{CommandError, ErrorReporter};
use crate::core::guild_config::{GuildConfig, GuildConfigService, GuildConfigStore};
use std::sync::Arc;
use std::time::Duration;

pub const MAINTENANCE_NOTICE: &str = "The bot is under maintenance at the moment!";

/// Result of one prefix-match / word-extract / lookup pass.
struct Pass {
    prefix: String,
    invoked_with: String,
    command: Option<Arc<Command>>,
    args: Vec<String>,
}

/// Run one dispatch pass over `content`. `None` means no prefix matched.
fn resolve_pass(registry: &CommandRegistry, content: &str, prefixes: &[String]) -> Option<Pass> {
    let prefix = match_prefix(content, prefixes)?;
    let rest = &content[prefix.len()..];

    let mut words = rest.split_whitespace();
    let invoked_with = words.next().unwrap_or_default().to_string();
    let args = words.map(str::to_string).collect();

    Some(Pass {
        prefix: prefix.to_string(),
        command: registry.get(&invoked_with),
        invoked_with,
        args,
    })
}

/// `prefix + alias + (content minus the prefix, trimmed)`.
pub fn rewrite_with_alias(content: &str, prefix: &str, alias: &str) -> String {
    let remainder = content.replacen(prefix, "", 1);
    format!("{}{}{}", prefix, alias, remainder.trim())
}

pub struct DispatchService<S: GuildConfigStore> {
    resolver: PrefixResolver,
    registry: CommandRegistry,
    state: Arc<BotState>,
    guild_config: Arc<GuildConfigService<S>>,
    reporter: ErrorReporter,
    telemetry: Arc<dyn Telemetry>,
    handler_timeout: Duration,
}

impl<S: GuildConfigStore> DispatchService<S> {
    pub fn new(
        resolver: PrefixResolver,
        registry: CommandRegistry,
        state: Arc<BotState>,
        guild_config: Arc<GuildConfigService<S>>,
        reporter: ErrorReporter,
        telemetry: Arc<dyn Telemetry>,
        handler_timeout: Duration,
    ) -> Self {
        Self {
            resolver,
            registry,
            state,
            guild_config,
            reporter,
            telemetry,
            handler_timeout,
        }
    }

    pub fn state(&self) -> &Arc<BotState> {
        &self.state
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Handle one inbound message. Never returns an error: every failure ends
    /// in one of the classifier's dispositions.
    pub async fn handle_message(
        &self,
        message: IncomingMessage,
        outbox: &dyn Outbox,
    ) -> DispatchOutcome {
        self.state.record_message();

        if message.author_is_bot {
            return DispatchOutcome::BotAuthor;
        }

        let guild_config = self.load_guild_config(&message).await;
        let prefixes = self
            .resolver
            .candidates(guild_config.as_ref().and_then(|c| c.prefix.as_deref()));

        // First pass
        let Some(first) = resolve_pass(&self.registry, &message.content, &prefixes) else {
            return DispatchOutcome::NoPrefix;
        };

        let (pass, content, rewritten) = if first.command.is_some() {
            (first, message.content.clone(), false)
        } else {
            // Second and last pass, on the default-game rewrite
            let alias = self.state.default_games.alias_for(message.routing_id());
            let content = rewrite_with_alias(&message.content, &first.prefix, alias);
            match resolve_pass(&self.registry, &content, &prefixes) {
                Some(second) if second.command.is_some() => (second, content, true),
                _ => {
                    tracing::trace!(
                        invoked_with = %first.invoked_with,
                        rewritten = %content,
                        "No command after default game rewrite"
                    );
                    return DispatchOutcome::NotFound;
                }
            }
        };

        let ctx = DispatchContext {
            prefix: pass.prefix,
            usage_prefix: usage_prefix(&prefixes).to_string(),
            invoked_with: pass.invoked_with,
            command: pass.command,
            args: pass.args,
            language: resolve_language(&message, guild_config.as_ref()),
            content,
            message,
        };

        if self.state.blacklist.is_blocked(&ctx.message).await {
            tracing::debug!(
                user_id = ctx.message.author_id,
                channel_id = ctx.message.channel_id,
                "Dropping command from blacklisted source"
            );
            return DispatchOutcome::Blacklisted;
        }

        if self.state.in_maintenance() && !self.state.is_operator(ctx.message.author_id) {
            if let Err(err) = outbox
                .send(ctx.message.channel_id, MAINTENANCE_NOTICE.into())
                .await
            {
                tracing::warn!(error = %err, "Failed to send maintenance notice");
            }
            return DispatchOutcome::Maintenance;
        }

        self.invoke(ctx, rewritten, outbox).await
    }

    async fn invoke(
        &self,
        ctx: DispatchContext,
        rewritten: bool,
        outbox: &dyn Outbox,
    ) -> DispatchOutcome {
        let Some(command) = ctx.command.clone() else {
            return DispatchOutcome::NotFound;
        };

        if !command.hidden {
            self.telemetry
                .command_invoked(&CommandEvent::from_context(&ctx));
        }
        tracing::info!(
            target: "statsy::commands",
            command = %command.name,
            user_id = ctx.message.author_id,
            guild = %ctx.message.guild_label(),
            language = %ctx.language,
            "{}",
            ctx.content
        );

        let state = self.state.as_ref();
        let result = match command.check.map(|check| check(&ctx, state)) {
            Some(Err(err)) => Err(err),
            _ => {
                let invocation = Invocation {
                    context: &ctx,
                    outbox,
                    state,
                };
                tokio::time::timeout(self.handler_timeout, command.handler.call(invocation))
                    .await
                    .unwrap_or_else(|_| Err(CommandError::Timeout(self.handler_timeout)))
            }
        };

        match result {
            Ok(()) => DispatchOutcome::Invoked {
                command: command.name.clone(),
                rewritten,
            },
            Err(err) => {
                let category = self.reporter.handle(&ctx, err, outbox).await;
                DispatchOutcome::Failed {
                    command: command.name.clone(),
                    rewritten,
                    category,
                }
            }
        }
    }

    /// Guild document for guild text channels, if any. A store failure is
    /// logged and treated as "not configured".
    async fn load_guild_config(&self, message: &IncomingMessage) -> Option<GuildConfig> {
        let guild_id = message.guild_id?;
        match self.guild_config.get(guild_id).await {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(guild_id, error = %err, "Failed to load guild config");
                None
            }
        }
    }
}

fn resolve_language(message: &IncomingMessage, config: Option<&GuildConfig>) -> String {
    match message.channel_kind {
        ChannelKind::GuildText => config
            .and_then(|c| c.language.clone())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        ChannelKind::Other => DEFAULT_LANGUAGE.to_string(),
    }
}
