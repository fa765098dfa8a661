// Serenity implementation of the dispatcher's outbox.

use crate::core::dispatch::{EmbedReply, OperatorReport, Outbox, Reply, SendError};
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Duration;

/// Discord rejects embed titles longer than this.
const EMBED_TITLE_LIMIT: usize = 256;

pub struct SerenityOutbox {
    http: Arc<serenity::Http>,
    operator_channel: Option<serenity::ChannelId>,
    latency: Option<Duration>,
}

impl SerenityOutbox {
    pub fn new(http: Arc<serenity::Http>, operator_channel: Option<u64>) -> Self {
        Self {
            http,
            operator_channel: operator_channel.map(serenity::ChannelId::new),
            latency: None,
        }
    }

    pub fn with_latency(mut self, latency: Option<Duration>) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl Outbox for SerenityOutbox {
    async fn send(&self, channel_id: u64, reply: Reply) -> Result<(), SendError> {
        let message = match reply {
            Reply::Text(text) => serenity::CreateMessage::new().content(text),
            Reply::Embed(embed) => serenity::CreateMessage::new().embed(build_embed(embed)),
        };

        serenity::ChannelId::new(channel_id)
            .send_message(&self.http, message)
            .await
            .map(|_| ())
            .map_err(send_error)
    }

    async fn send_operator_report(&self, report: OperatorReport) -> Result<(), SendError> {
        let channel = self.operator_channel.ok_or(SendError::NoOperatorChannel)?;

        let mut embed = serenity::CreateEmbed::new()
            .title(truncate_chars(&report.title, EMBED_TITLE_LIMIT))
            .description(report.body)
            .color(report.color);
        if let Some(footer) = report.footer {
            embed = embed.footer(serenity::CreateEmbedFooter::new(footer));
        }

        channel
            .send_message(&self.http, serenity::CreateMessage::new().embed(embed))
            .await
            .map(|_| ())
            .map_err(send_error)
    }

    fn gateway_latency(&self) -> Option<Duration> {
        self.latency
    }
}

fn build_embed(embed: EmbedReply) -> serenity::CreateEmbed {
    let mut builder = serenity::CreateEmbed::new().color(embed.color);

    if let Some(title) = embed.title {
        builder = builder.title(truncate_chars(&title, EMBED_TITLE_LIMIT));
    }
    if let Some(description) = embed.description {
        builder = builder.description(description);
    }
    if let Some(url) = embed.url {
        builder = builder.url(url);
    }
    if let Some(image) = embed.image {
        builder = builder.image(image);
    }
    for (name, value, inline) in embed.fields {
        builder = builder.field(name, value, inline);
    }

    builder
}

fn send_error(err: serenity::Error) -> SendError {
    match &err {
        serenity::Error::Http(::serenity::http::HttpError::UnsuccessfulRequest(response))
            if response.status_code.as_u16() == 403 =>
        {
            SendError::Forbidden
        }
        _ => SendError::Other(err.to_string()),
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
