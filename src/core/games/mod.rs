pub mod game;
pub mod tag_service;

pub use game::{Game, UnknownGame};
pub use tag_service::{normalize_tag, TagError, TagService, TagStore};
