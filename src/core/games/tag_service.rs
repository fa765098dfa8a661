// Saved player tags.
//
// Users save their in-game tag once (`crsave #ABC`) so profile commands work
// without arguments.

use super::game::Game;
use crate::core::errors::CommandError;
use async_trait::async_trait;
use thiserror::Error;

/// Characters Supercell uses in player and clan tags.
const TAG_CHARACTERS: &str = "0289PYLQGRJCUV";
const MIN_TAG_LEN: usize = 3;
const MAX_TAG_LEN: usize = 15;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("Invalid {game} tag. Tags only contain the characters `{}`.", TAG_CHARACTERS)]
    Invalid { game: Game },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<TagError> for CommandError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::Invalid {
                game: Game::BrawlStars,
            } => CommandError::InvalidBsTag {
                message: err.to_string(),
            },
            TagError::Invalid { .. } => CommandError::invalid_tag(err.to_string()),
            TagError::Storage(msg) => CommandError::Unexpected(anyhow::anyhow!(msg)),
        }
    }
}

/// Strip `#`, uppercase, map the letter O to zero and validate.
pub fn normalize_tag(game: Game, raw: &str) -> Result<String, TagError> {
    let tag: String = raw
        .trim()
        .trim_start_matches('#')
        .to_uppercase()
        .replace('O', "0");

    let valid_len = (MIN_TAG_LEN..=MAX_TAG_LEN).contains(&tag.chars().count());
    if valid_len && tag.chars().all(|c| TAG_CHARACTERS.contains(c)) {
        Ok(tag)
    } else {
        Err(TagError::Invalid { game })
    }
}

// ============================================================================
// STORAGE TRAIT (PORT)
// ============================================================================

#[async_trait]
pub trait TagStore: Send + Sync {
    async fn get_tag(&self, user_id: u64, game: Game) -> Result<Option<String>, TagError>;
    async fn save_tag(&self, user_id: u64, game: Game, tag: &str) -> Result<(), TagError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct TagService<S: TagStore> {
    store: S,
}

impl<S: TagStore> TagService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and save a tag. Returns the normalized tag.
    pub async fn save(&self, user_id: u64, game: Game, raw: &str) -> Result<String, TagError> {
        let tag = normalize_tag(game, raw)?;
        self.store.save_tag(user_id, game, &tag).await?;
        Ok(tag)
    }

    pub async fn get(&self, user_id: u64, game: Game) -> Result<Option<String>, TagError> {
        self.store.get_tag(user_id, game).await
    }

    /// Tag given on the command line, or the saved one.
    pub async fn resolve(
        &self,
        user_id: u64,
        game: Game,
        explicit: Option<&str>,
    ) -> Result<Option<String>, TagError> {
        match explicit {
            Some(raw) => normalize_tag(game, raw).map(Some),
            None => self.get(user_id, game).await,
        }
    }
}
