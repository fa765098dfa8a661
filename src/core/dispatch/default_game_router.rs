// Guild/channel -> default game bindings.
//
// Seeded from guild configuration at connect time and updated in place when
// a guild picks a new default game. Lookups read the live map on every
// dispatch.

use crate::core::games::Game;
use dashmap::DashMap;

#[derive(Debug)]
pub struct DefaultGameRouter {
    bindings: DashMap<u64, Game>,
    fallback: Game,
}

impl DefaultGameRouter {
    pub fn new(fallback: Game) -> Self {
        Self {
            bindings: DashMap::new(),
            fallback,
        }
    }

    /// Bulk-load bindings (connect time).
    pub fn seed(&self, bindings: impl IntoIterator<Item = (u64, Game)>) {
        for (id, game) in bindings {
            self.bindings.insert(id, game);
        }
    }

    pub fn set(&self, id: u64, game: Game) {
        self.bindings.insert(id, game);
    }

    /// Always resolves to some game.
    pub fn resolve(&self, id: u64) -> Game {
        self.bindings
            .get(&id)
            .map(|entry| *entry.value())
            .unwrap_or(self.fallback)
    }

    pub fn alias_for(&self, id: u64) -> &'static str {
        self.resolve(id).alias()
    }
}

impl Default for DefaultGameRouter {
    fn default() -> Self {
        Self::new(Game::FALLBACK)
    }
}
