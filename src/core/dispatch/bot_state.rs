// Shared process-wide state read by every dispatch.

use super::blacklist::BlacklistGate;
use super::default_game_router::DefaultGameRouter;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub struct BotState {
    /// Developers exempt from maintenance mode and allowed to run operator commands.
    operators: HashSet<u64>,
    maintenance: AtomicBool,
    messages_seen: AtomicU64,
    started_at: DateTime<Utc>,
    pub blacklist: BlacklistGate,
    pub default_games: DefaultGameRouter,
}

impl BotState {
    pub fn new(operators: impl IntoIterator<Item = u64>) -> Self {
        Self {
            operators: operators.into_iter().collect(),
            maintenance: AtomicBool::new(false),
            messages_seen: AtomicU64::new(0),
            started_at: Utc::now(),
            blacklist: BlacklistGate::new(),
            default_games: DefaultGameRouter::default(),
        }
    }

    pub fn is_operator(&self, user_id: u64) -> bool {
        self.operators.contains(&user_id)
    }

    pub fn in_maintenance(&self) -> bool {
        self.maintenance.load(Ordering::Relaxed)
    }

    pub fn set_maintenance(&self, enabled: bool) {
        self.maintenance.store(enabled, Ordering::Relaxed);
    }

    /// Flip maintenance mode and return the new value.
    pub fn toggle_maintenance(&self) -> bool {
        !self.maintenance.fetch_xor(true, Ordering::Relaxed)
    }

    /// Count one received message. Returns the new total.
    pub fn record_message(&self) -> u64 {
        self.messages_seen.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn messages_seen(&self) -> u64 {
        self.messages_seen.load(Ordering::Relaxed)
    }

    pub fn uptime(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_maintenance() {
        let state = BotState::new([1]);
        assert!(!state.in_maintenance());
        assert!(state.toggle_maintenance());
        assert!(state.in_maintenance());
        assert!(!state.toggle_maintenance());
        assert!(!state.in_maintenance());
    }

    #[test]
    fn test_message_counter() {
        let state = BotState::new([]);
        assert_eq!(state.record_message(), 1);
        assert_eq!(state.record_message(), 2);
        assert_eq!(state.messages_seen(), 2);
    }

    #[test]
    fn test_operators() {
        let state = BotState::new([10, 20]);
        assert!(state.is_operator(10));
        assert!(!state.is_operator(30));
    }
}
