// Process-wide blacklist of users, channels and guilds.
//
// Readers grab an `Arc` snapshot; a reload swaps the whole snapshot so a
// dispatch never sees a half-updated set.

use super::dispatch_models::IncomingMessage;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ids are stored as strings, matching the persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlacklistSet {
    #[serde(default)]
    pub users: HashSet<String>,
    #[serde(default)]
    pub channels: HashSet<String>,
    #[serde(default)]
    pub guilds: HashSet<String>,
}

impl BlacklistSet {
    pub fn blocks(&self, message: &IncomingMessage) -> bool {
        self.users.contains(&message.author_id.to_string())
            || self.channels.contains(&message.channel_id.to_string())
            || message
                .guild_id
                .is_some_and(|id| self.guilds.contains(&id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.users.len() + self.channels.len() + self.guilds.len()
    }
}

#[derive(Debug, Default)]
pub struct BlacklistGate {
    current: RwLock<Arc<BlacklistSet>>,
}

impl BlacklistGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Arc<BlacklistSet> {
        Arc::clone(&*self.current.read().await)
    }

    /// Replace the whole set at once.
    pub async fn replace(&self, set: BlacklistSet) {
        *self.current.write().await = Arc::new(set);
    }

    pub async fn is_blocked(&self, message: &IncomingMessage) -> bool {
        self.snapshot().await.blocks(message)
    }
}
