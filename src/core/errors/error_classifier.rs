// Maps a command failure to what the user (and operators) should see.

use super::command_error::CommandError;
use crate::core::dispatch::{DispatchContext, EmbedReply, Reply};
use rand::Rng;

/// Picture showing where to find a Brawl Stars tag in game.
const BS_TAG_GUIDE_IMAGE: &str = "https://i.imgur.com/Al3Ourz.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Expected, no user impact.
    Ignored,
    /// Bad input that gets a corrective reply.
    UserCorrectable,
    /// The bot (or user) lacks rights; reply if we can.
    PermissionDenied,
    /// Unexpected: apology to the user, full report to operators.
    Unclassified,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    Ignore,
    /// Send this corrective reply.
    Correct(Reply),
    /// Send the command's usage hint.
    Usage,
    /// Try to tell the channel which permissions are missing.
    NotifyMissingPermissions(String),
    /// Apologise and forward a report to operators.
    Report,
}

impl Disposition {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Disposition::Ignore => ErrorCategory::Ignored,
            Disposition::Correct(_) | Disposition::Usage => ErrorCategory::UserCorrectable,
            Disposition::NotifyMissingPermissions(_) => ErrorCategory::PermissionDenied,
            Disposition::Report => ErrorCategory::Unclassified,
        }
    }
}

pub fn classify(error: &CommandError) -> Disposition {
    match error {
        CommandError::Forbidden
        | CommandError::NoTag
        | CommandError::Api(_)
        | CommandError::CheckFailure(_)
        | CommandError::Disabled => Disposition::Ignore,

        CommandError::InvalidBsTag { message } => {
            Disposition::Correct(Reply::Embed(invalid_bs_tag_embed(message)))
        }
        CommandError::InvalidTag { message } | CommandError::InvalidPlatform { message } => {
            Disposition::Correct(Reply::Text(message.clone()))
        }
        CommandError::NoPrivateMessage => Disposition::Correct(Reply::Text(error.to_string())),

        CommandError::BotMissingPermissions(_) => {
            Disposition::NotifyMissingPermissions(error.to_string())
        }

        CommandError::MissingArgument(_) | CommandError::BadArgument(_) => Disposition::Usage,

        CommandError::Timeout(_) | CommandError::Unexpected(_) => Disposition::Report,
    }
}

pub fn invalid_bs_tag_embed(message: &str) -> EmbedReply {
    EmbedReply::new()
        .title("Invalid Tag")
        .description(message)
        .color(random_color())
        .image(BS_TAG_GUIDE_IMAGE)
}

/// ``Usage: {prefix}{name} {signature}`` with the command's help text.
pub fn usage_embed(ctx: &DispatchContext) -> EmbedReply {
    let (usage, help) = match &ctx.command {
        Some(command) => (command.usage(), command.help.clone()),
        None => (ctx.invoked_with.clone(), String::new()),
    };

    let embed = EmbedReply::new()
        .title(format!("``Usage: {}{}``", ctx.usage_prefix, usage))
        .color(random_color());

    if help.is_empty() {
        embed
    } else {
        embed.description(help)
    }
}

pub fn random_color() -> u32 {
    rand::thread_rng().gen_range(0..=0xFF_FFFF)
}
