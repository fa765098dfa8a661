// Command registry - maps invocation words to commands.
//
// Commands are registered from an explicit list at startup. Every name and
// alias must be unique across the registry: the first registrant keeps the
// word and a collision is reported as a startup error.

use super::bot_state::BotState;
use super::dispatch_models::{DispatchContext, Reply};
use super::outbound::{Outbox, SendError};
use crate::core::errors::CommandError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// HANDLERS
// ============================================================================

/// Everything a handler gets to work with for one invocation.
pub struct Invocation<'a> {
    pub context: &'a DispatchContext,
    pub outbox: &'a dyn Outbox,
    pub state: &'a BotState,
}

impl<'a> Invocation<'a> {
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.context.args.get(index).map(|a| a.as_str())
    }

    /// Reply in the channel the command came from.
    pub async fn reply(&self, reply: impl Into<Reply>) -> Result<(), CommandError> {
        self.outbox
            .send(self.context.message.channel_id, reply.into())
            .await
            .map_err(|err| match err {
                SendError::Forbidden => CommandError::Forbidden,
                other => CommandError::Unexpected(anyhow::anyhow!(other)),
            })
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError>;
}

/// Requirement checked before the handler runs.
pub type Check = fn(&DispatchContext, &BotState) -> Result<(), CommandError>;

pub fn operator_only(ctx: &DispatchContext, state: &BotState) -> Result<(), CommandError> {
    if state.is_operator(ctx.message.author_id) {
        Ok(())
    } else {
        Err(CommandError::check_failure("operator only"))
    }
}

pub fn guild_only(ctx: &DispatchContext, _state: &BotState) -> Result<(), CommandError> {
    if ctx.message.guild_id.is_some() {
        Ok(())
    } else {
        Err(CommandError::NoPrivateMessage)
    }
}

pub fn manage_guild(ctx: &DispatchContext, state: &BotState) -> Result<(), CommandError> {
    guild_only(ctx, state)?;
    if ctx.message.author_can_manage_guild || state.is_operator(ctx.message.author_id) {
        Ok(())
    } else {
        Err(CommandError::check_failure("requires Manage Server"))
    }
}

/// The bot has to be able to post embeds in the channel.
pub fn bot_embed_links(ctx: &DispatchContext, _state: &BotState) -> Result<(), CommandError> {
    if ctx.message.bot_can_embed {
        Ok(())
    } else {
        Err(CommandError::BotMissingPermissions(vec!["Embed Links".to_string()]))
    }
}

// ============================================================================
// COMMAND
// ============================================================================

pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    /// Argument part of the usage line, e.g. `[tag]`.
    pub signature: String,
    pub help: String,
    /// Hidden commands never emit telemetry.
    pub hidden: bool,
    pub check: Option<Check>,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            signature: String::new(),
            help: String::new(),
            hidden: false,
            check: None,
            handler: Arc::new(handler),
        }
    }

    pub fn aliases<I, A>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn check(mut self, check: Check) -> Self {
        self.check = Some(check);
        self
    }

    /// `name signature`, without a prefix.
    pub fn usage(&self) -> String {
        if self.signature.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.signature)
        }
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(|a| a.as_str()))
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("hidden", &self.hidden)
            .finish()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("'{word}' of command '{command}' is already registered by '{owner}'")]
    Collision {
        word: String,
        command: String,
        owner: String,
    },

    #[error("Command words cannot be empty or contain whitespace: {0:?}")]
    InvalidWord(String),
}

#[derive(Default)]
pub struct CommandRegistry {
    words: HashMap<String, Arc<Command>>,
    commands: Vec<Arc<Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command under its name and aliases.
    ///
    /// Nothing is registered when any word collides.
    pub fn register(&mut self, command: Command) -> Result<(), RegistryError> {
        for word in command.words() {
            if word.is_empty() || word.chars().any(char::is_whitespace) {
                return Err(RegistryError::InvalidWord(word.to_string()));
            }
            if let Some(owner) = self.words.get(word) {
                return Err(RegistryError::Collision {
                    word: word.to_string(),
                    command: command.name.clone(),
                    owner: owner.name.clone(),
                });
            }
        }

        let mut seen = std::collections::HashSet::new();
        for word in command.words() {
            if !seen.insert(word) {
                return Err(RegistryError::Collision {
                    word: word.to_string(),
                    command: command.name.clone(),
                    owner: command.name.clone(),
                });
            }
        }

        let command = Arc::new(command);
        for word in command.words() {
            self.words.insert(word.to_string(), Arc::clone(&command));
        }
        self.commands.push(command);
        Ok(())
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, word: &str) -> Option<Arc<Command>> {
        self.words.get(word).cloned()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn call(&self, _invocation: Invocation<'_>) -> Result<(), CommandError> {
            Ok(())
        }
    }

    #[test]
    fn test_lookup_by_name_and_alias() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("crprofile", Noop).aliases(["crp"]))
            .unwrap();

        assert_eq!(registry.get("crprofile").unwrap().name, "crprofile");
        assert_eq!(registry.get("crp").unwrap().name, "crprofile");
        assert!(registry.get("CRPROFILE").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_collision_keeps_first_registrant() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("ping", Noop).aliases(["p"]))
            .unwrap();

        let err = registry
            .register(Command::new("profile", Noop).aliases(["p"]))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Collision {
                word: "p".to_string(),
                command: "profile".to_string(),
                owner: "ping".to_string(),
            }
        );

        // The rejected command left nothing behind
        assert!(registry.get("profile").is_none());
        assert_eq!(registry.get("p").unwrap().name, "ping");
    }

    #[test]
    fn test_rejects_duplicate_alias_within_command() {
        let mut registry = CommandRegistry::new();
        let err = registry
            .register(Command::new("ping", Noop).aliases(["ping"]))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Collision { .. }));
    }

    #[test]
    fn test_rejects_whitespace_words() {
        let mut registry = CommandRegistry::new();
        let err = registry.register(Command::new("two words", Noop)).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidWord(_)));
    }

    #[test]
    fn test_usage_line() {
        let command = Command::new("crsave", Noop).signature("<tag>");
        assert_eq!(command.usage(), "crsave <tag>");
        assert_eq!(Command::new("ping", Noop).usage(), "ping");
    }
}
