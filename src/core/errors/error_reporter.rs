// Carries out the classifier's decision.
//
// Nothing in here may fail: every send error ends up in the local log so a
// broken operator channel can never take the dispatcher down with it.

use super::command_error::CommandError;
use super::error_classifier::{classify, usage_embed, Disposition, ErrorCategory};
use crate::core::dispatch::{
    DispatchContext, OperatorReport, Outbox, PasteService, Reply, SendError,
};
use std::sync::Arc;

/// Discord's message size limit; longer reports go to the paste service.
pub const REPORT_INLINE_LIMIT: usize = 2000;

pub const APOLOGY: &str = "Something went wrong and we are investigating the issue now.";

const COMMAND_REPORT_COLOR: u32 = 0xE67E22; // orange
const EVENT_REPORT_COLOR: u32 = 0xE74C3C; // red
const TRUNCATION_MARKER: &str = "\n... (truncated)";

pub struct ErrorReporter {
    paste: Arc<dyn PasteService>,
    /// Print reports locally instead of sending them.
    dev_mode: bool,
}

impl ErrorReporter {
    pub fn new(paste: Arc<dyn PasteService>, dev_mode: bool) -> Self {
        Self { paste, dev_mode }
    }

    /// Classify `error` and act on it. Returns the category it fell into.
    pub async fn handle(
        &self,
        ctx: &DispatchContext,
        error: CommandError,
        outbox: &dyn Outbox,
    ) -> ErrorCategory {
        let disposition = classify(&error);
        let category = disposition.category();

        match disposition {
            Disposition::Ignore => {
                tracing::debug!(
                    command = %ctx.command_name(),
                    error = %error,
                    "Ignoring expected command error"
                );
            }
            Disposition::Correct(reply) => self.reply(ctx, outbox, reply).await,
            Disposition::Usage => {
                self.reply(ctx, outbox, Reply::Embed(usage_embed(ctx))).await
            }
            Disposition::NotifyMissingPermissions(notice) => {
                match outbox.send(ctx.message.channel_id, Reply::Text(notice)).await {
                    Ok(()) | Err(SendError::Forbidden) => {}
                    Err(err) => tracing::warn!(
                        channel_id = ctx.message.channel_id,
                        error = %err,
                        "Failed to send missing permissions notice"
                    ),
                }
            }
            Disposition::Report => {
                self.reply(ctx, outbox, Reply::Text(APOLOGY.to_string())).await;
                let report = self.command_report(ctx, &error).await;
                self.deliver(outbox, report).await;
            }
        }

        category
    }

    /// Report a failure that happened outside command handling.
    pub async fn report_event_error(&self, event: &str, error: &anyhow::Error, outbox: &dyn Outbox) {
        let report = OperatorReport {
            title: event.to_string(),
            body: self.render_trace(&format!("{:?}", error)).await,
            footer: None,
            color: EVENT_REPORT_COLOR,
        };
        self.deliver(outbox, report).await;
    }

    async fn command_report(&self, ctx: &DispatchContext, error: &CommandError) -> OperatorReport {
        let detail = match error {
            CommandError::Unexpected(inner) => format!("{:?}", inner),
            other => format!("{:?}", other),
        };
        let trace = format!(
            "Ignoring exception in command {}:\n{}",
            ctx.command_name(),
            detail
        );

        OperatorReport {
            title: ctx.message.content.clone(),
            body: self.render_trace(&trace).await,
            footer: Some(format!(
                "G: {} | C: {} | U: {}",
                ctx.message.guild_label(),
                ctx.message.channel_id,
                ctx.message.author_id
            )),
            color: COMMAND_REPORT_COLOR,
        }
    }

    /// Inline code block, or a paste link when that would be too long.
    /// Falls back to a truncated block if the upload fails.
    async fn render_trace(&self, trace: &str) -> String {
        let inline = code_block(trace);
        if inline.chars().count() <= REPORT_INLINE_LIMIT {
            return inline;
        }

        match self.paste.upload(trace).await {
            Ok(link) => link,
            Err(err) => {
                tracing::warn!(error = %err, "Paste upload failed, truncating report");
                truncate_inline(trace)
            }
        }
    }

    async fn reply(&self, ctx: &DispatchContext, outbox: &dyn Outbox, reply: Reply) {
        if let Err(err) = outbox.send(ctx.message.channel_id, reply).await {
            tracing::warn!(
                channel_id = ctx.message.channel_id,
                error = %err,
                "Failed to send error reply"
            );
        }
    }

    async fn deliver(&self, outbox: &dyn Outbox, report: OperatorReport) {
        if self.dev_mode {
            tracing::error!(title = %report.title, "{}", report.body);
            return;
        }

        let title = report.title.clone();
        let body = report.body.clone();
        if let Err(err) = outbox.send_operator_report(report).await {
            tracing::error!(
                error = %err,
                title = %title,
                "Failed to deliver operator report:\n{}",
                body
            );
        }
    }
}

fn code_block(text: &str) -> String {
    format!("```rs\n{}\n```", text)
}

fn truncate_inline(trace: &str) -> String {
    let overhead = code_block("").chars().count() + TRUNCATION_MARKER.chars().count();
    let mut body: String = trace
        .chars()
        .take(REPORT_INLINE_LIMIT.saturating_sub(overhead))
        .collect();
    body.push_str(TRUNCATION_MARKER);
    code_block(&body)
}
