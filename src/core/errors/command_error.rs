// Everything a command handler can fail with.
//
// The classifier matches on every variant, so a new kind of failure has to
// pick a disposition when it is added here.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    /// Discord refused an action (403) while the handler was running.
    #[error("Missing access to perform an action")]
    Forbidden,

    /// The user has no saved tag. The handler already told them how to save one.
    #[error("No tag saved")]
    NoTag,

    /// A game API or page scrape failed upstream.
    #[allow(dead_code)] // Raised by the stats clients, which live outside this crate
    #[error("Upstream API error: {0}")]
    Api(String),

    #[error("Check failed: {0}")]
    CheckFailure(String),

    #[allow(dead_code)] // Raised by the stats clients, which live outside this crate
    #[error("Command is disabled")]
    Disabled,

    #[error("{message}")]
    InvalidTag { message: String },

    /// Brawl Stars tags get their own embed with a "where is my tag" picture.
    #[error("{message}")]
    InvalidBsTag { message: String },

    #[allow(dead_code)] // Raised by the stats clients, which live outside this crate
    #[error("{message}")]
    InvalidPlatform { message: String },

    #[error("Bot requires {} permission(s) to run this command.", .0.join(", "))]
    BotMissingPermissions(Vec<String>),

    #[error("This command can only be used in servers.")]
    NoPrivateMessage,

    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Bad argument: {0}")]
    BadArgument(String),

    #[error("Command timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl CommandError {
    pub fn invalid_tag(message: impl Into<String>) -> Self {
        CommandError::InvalidTag {
            message: message.into(),
        }
    }

    pub fn check_failure(reason: impl Into<String>) -> Self {
        CommandError::CheckFailure(reason.into())
    }
}
