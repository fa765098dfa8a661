// Operator-only commands. All of these are hidden and never emit telemetry.

use crate::core::dispatch::{CommandHandler, Invocation};
use crate::core::errors::CommandError;
use crate::core::guild_config::{GuildConfigService, GuildConfigStore};
use async_trait::async_trait;
use std::sync::Arc;

/// `maintenance [on|off]` - toggles when no argument is given.
pub struct MaintenanceCommand;

#[async_trait]
impl CommandHandler for MaintenanceCommand {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        let state = invocation.state;
        let enabled = match invocation.arg(0).map(str::to_ascii_lowercase).as_deref() {
            None => state.toggle_maintenance(),
            Some("on") => {
                state.set_maintenance(true);
                true
            }
            Some("off") => {
                state.set_maintenance(false);
                false
            }
            Some(other) => return Err(CommandError::BadArgument(other.to_string())),
        };

        tracing::info!(
            user_id = invocation.context.message.author_id,
            enabled,
            "Maintenance mode changed"
        );

        let status = if enabled { "on" } else { "off" };
        invocation
            .reply(format!("Maintenance mode is now {}.", status))
            .await
    }
}

/// `reloadblacklist` - re-read the blacklist document and swap it in.
pub struct ReloadBlacklistCommand<S: GuildConfigStore> {
    guild_config: Arc<GuildConfigService<S>>,
}

impl<S: GuildConfigStore> ReloadBlacklistCommand<S> {
    pub fn new(guild_config: Arc<GuildConfigService<S>>) -> Self {
        Self { guild_config }
    }
}

#[async_trait]
impl<S: GuildConfigStore + 'static> CommandHandler for ReloadBlacklistCommand<S> {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        let blacklist = self.guild_config.load_blacklist().await?;
        let entries = blacklist.len();
        invocation.state.blacklist.replace(blacklist).await;

        tracing::info!(entries, "Blacklist reloaded");
        invocation
            .reply(format!("Blacklist reloaded ({} entries).", entries))
            .await
    }
}

/// Re-executes the running binary. Only returns if that failed.
pub type Restarter = fn() -> std::io::Error;

/// `restart` - replace the process image with a fresh one.
pub struct RestartCommand {
    restart: Restarter,
}

impl RestartCommand {
    pub fn new(restart: Restarter) -> Self {
        Self { restart }
    }
}

#[async_trait]
impl CommandHandler for RestartCommand {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        invocation.reply("Restarting...").await?;
        tracing::warn!(
            user_id = invocation.context.message.author_id,
            "Restart requested"
        );

        let err = (self.restart)();
        Err(CommandError::Unexpected(
            anyhow::Error::new(err).context("failed to restart"),
        ))
    }
}

#[cfg(unix)]
pub fn exec_self() -> std::io::Error {
    use std::os::unix::process::CommandExt;

    match std::env::current_exe() {
        Ok(exe) => std::process::Command::new(exe)
            .args(std::env::args_os().skip(1))
            .exec(),
        Err(err) => err,
    }
}

#[cfg(not(unix))]
pub fn exec_self() -> std::io::Error {
    let spawned = std::env::current_exe().and_then(|exe| {
        std::process::Command::new(exe)
            .args(std::env::args_os().skip(1))
            .spawn()
    });
    match spawned {
        Ok(_) => std::process::exit(0),
        Err(err) => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::test_support::{guild_message, RecordingOutbox};
    use crate::core::dispatch::{BlacklistSet, BotState, DispatchContext, Reply};
    use crate::infra::guild_config::InMemoryGuildConfigStore;
    use std::collections::HashSet;

    fn context(content: &str, args: &[&str]) -> DispatchContext {
        DispatchContext {
            prefix: "!".into(),
            usage_prefix: "!".into(),
            invoked_with: "maintenance".into(),
            command: None,
            args: args.iter().map(|a| a.to_string()).collect(),
            language: "messages".into(),
            content: content.into(),
            message: guild_message(content),
        }
    }

    #[tokio::test]
    async fn test_maintenance_toggle_and_explicit() {
        let state = BotState::new([100]);
        let outbox = RecordingOutbox::new();

        for (args, expected) in [(vec![], true), (vec!["off"], false), (vec!["ON"], true)] {
            let ctx = context("!maintenance", &args);
            MaintenanceCommand
                .call(Invocation {
                    context: &ctx,
                    outbox: &outbox,
                    state: &state,
                })
                .await
                .unwrap();
            assert_eq!(state.in_maintenance(), expected);
        }

        assert_eq!(
            outbox.sent().last().unwrap().1,
            Reply::Text("Maintenance mode is now on.".into())
        );
    }

    #[tokio::test]
    async fn test_maintenance_rejects_unknown_argument() {
        let state = BotState::new([100]);
        let outbox = RecordingOutbox::new();
        let ctx = context("!maintenance maybe", &["maybe"]);

        let err = MaintenanceCommand
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::BadArgument(_)));
        assert!(!state.in_maintenance());
    }

    #[tokio::test]
    async fn test_reload_blacklist_swaps_snapshot() {
        let store = InMemoryGuildConfigStore::new();
        store
            .set_blacklist(BlacklistSet {
                guilds: HashSet::from(["300".to_string()]),
                ..Default::default()
            })
            .await;
        let command = ReloadBlacklistCommand::new(Arc::new(GuildConfigService::new(store)));

        let state = BotState::new([100]);
        let outbox = RecordingOutbox::new();
        let ctx = context("!reloadblacklist", &[]);
        assert!(!state.blacklist.is_blocked(&ctx.message).await);

        command
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap();

        assert!(state.blacklist.is_blocked(&ctx.message).await);
        assert_eq!(
            outbox.sent()[0].1,
            Reply::Text("Blacklist reloaded (1 entries).".into())
        );
    }

    #[tokio::test]
    async fn test_failed_restart_is_unexpected() {
        fn refuse() -> std::io::Error {
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope")
        }

        let state = BotState::new([100]);
        let outbox = RecordingOutbox::new();
        let ctx = context("!restart", &[]);

        let err = RestartCommand::new(refuse)
            .call(Invocation {
                context: &ctx,
                outbox: &outbox,
                state: &state,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::Unexpected(_)));
        assert_eq!(outbox.sent()[0].1, Reply::Text("Restarting...".into()));
    }
}
