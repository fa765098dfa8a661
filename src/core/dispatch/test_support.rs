// Recording fakes of the outbound ports, shared by the dispatch tests.

use super::command_registry::{CommandHandler, Invocation};
use super::dispatch_models::{ChannelKind, IncomingMessage, Reply};
use super::outbound::{
    CommandEvent, OperatorReport, Outbox, PasteError, PasteService, SendError, Telemetry,
};
use crate::core::errors::CommandError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn guild_message(content: &str) -> IncomingMessage {
    IncomingMessage {
        author_id: 100,
        author_is_bot: false,
        author_can_manage_guild: false,
        bot_can_embed: true,
        channel_id: 200,
        channel_kind: ChannelKind::GuildText,
        guild_id: Some(300),
        content: content.to_string(),
    }
}

pub fn dm_message(content: &str) -> IncomingMessage {
    IncomingMessage {
        author_id: 100,
        author_is_bot: false,
        author_can_manage_guild: false,
        bot_can_embed: true,
        channel_id: 201,
        channel_kind: ChannelKind::Other,
        guild_id: None,
        content: content.to_string(),
    }
}

#[derive(Default)]
pub struct RecordingOutbox {
    pub sent: Mutex<Vec<(u64, Reply)>>,
    pub reports: Mutex<Vec<OperatorReport>>,
    /// Every `send` fails with `Forbidden` while set.
    pub forbid_sends: AtomicBool,
    /// Every operator report fails while set.
    pub forbid_reports: AtomicBool,
}

impl RecordingOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(u64, Reply)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn reports(&self) -> Vec<OperatorReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl Outbox for RecordingOutbox {
    async fn send(&self, channel_id: u64, reply: Reply) -> Result<(), SendError> {
        if self.forbid_sends.load(Ordering::SeqCst) {
            return Err(SendError::Forbidden);
        }
        self.sent.lock().unwrap().push((channel_id, reply));
        Ok(())
    }

    async fn send_operator_report(&self, report: OperatorReport) -> Result<(), SendError> {
        if self.forbid_reports.load(Ordering::SeqCst) {
            return Err(SendError::Forbidden);
        }
        self.reports.lock().unwrap().push(report);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingTelemetry {
    pub events: Mutex<Vec<CommandEvent>>,
}

impl RecordingTelemetry {
    pub fn events(&self) -> Vec<CommandEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn command_invoked(&self, event: &CommandEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Paste service that returns a fixed link, or fails.
pub struct FakePaste {
    pub fail: bool,
    pub uploads: Mutex<Vec<String>>,
}

impl FakePaste {
    pub fn ok() -> Self {
        Self {
            fail: false,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            uploads: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PasteService for FakePaste {
    async fn upload(&self, text: &str) -> Result<String, PasteError> {
        self.uploads.lock().unwrap().push(text.to_string());
        if self.fail {
            Err(PasteError::Request("connection refused".into()))
        } else {
            Ok("https://paste.example/abc".to_string())
        }
    }
}

/// Handler that counts calls and replies with a fixed text.
#[derive(Clone, Default)]
pub struct CountingHandler {
    pub calls: Arc<AtomicUsize>,
}

impl CountingHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandHandler for CountingHandler {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        invocation.reply("ok").await
    }
}

/// Handler that always fails with the error built by `make`.
pub struct FailingHandler {
    pub make: fn() -> CommandError,
}

#[async_trait]
impl CommandHandler for FailingHandler {
    async fn call(&self, _invocation: Invocation<'_>) -> Result<(), CommandError> {
        Err((self.make)())
    }
}

/// Handler that outlives any reasonable handler timeout.
pub struct SlowHandler;

#[async_trait]
impl CommandHandler for SlowHandler {
    async fn call(&self, invocation: Invocation<'_>) -> Result<(), CommandError> {
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        invocation.reply("too late").await
    }
}
