// The games Statsy knows about.
//
// Every game owns a command family: `{alias}profile`, `{alias}save`, ...
// Guild configuration stores the game *key* (e.g. `Clash_Royale`), while the
// dispatcher works with the *alias* (e.g. `cr`) when it rewrites input.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Game {
    #[serde(rename = "Clash_Royale")]
    ClashRoyale,
    #[serde(rename = "Clash_Of_Clans")]
    ClashOfClans,
    #[serde(rename = "Brawl_Stars")]
    BrawlStars,
}

impl Game {
    pub const ALL: [Game; 3] = [Game::ClashRoyale, Game::ClashOfClans, Game::BrawlStars];

    /// The game used when a guild or channel never picked one.
    pub const FALLBACK: Game = Game::ClashRoyale;

    /// Persisted identifier, as stored in `default_game`.
    pub fn key(&self) -> &'static str {
        match self {
            Game::ClashRoyale => "Clash_Royale",
            Game::ClashOfClans => "Clash_Of_Clans",
            Game::BrawlStars => "Brawl_Stars",
        }
    }

    /// Short prefix of the game's command family.
    pub fn alias(&self) -> &'static str {
        match self {
            Game::ClashRoyale => "cr",
            Game::ClashOfClans => "coc",
            Game::BrawlStars => "bs",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Game::ClashRoyale => "Clash Royale",
            Game::ClashOfClans => "Clash of Clans",
            Game::BrawlStars => "Brawl Stars",
        }
    }

    /// Public profile page for a (normalized) player tag.
    pub fn profile_url(&self, tag: &str) -> String {
        match self {
            Game::ClashRoyale => format!("https://royaleapi.com/player/{}", tag),
            Game::ClashOfClans => format!("https://www.clashofstats.com/players/{}", tag),
            Game::BrawlStars => format!("https://brawlify.com/stats/profile/{}", tag),
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown game: {0}")]
pub struct UnknownGame(pub String);

/// Accepts the persisted key or the alias, case-insensitively.
impl FromStr for Game {
    type Err = UnknownGame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Game::ALL
            .into_iter()
            .find(|game| {
                game.key().eq_ignore_ascii_case(needle) || game.alias().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownGame(needle.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_and_alias() {
        assert_eq!("Clash_Royale".parse::<Game>().unwrap(), Game::ClashRoyale);
        assert_eq!("clash_of_clans".parse::<Game>().unwrap(), Game::ClashOfClans);
        assert_eq!("BS".parse::<Game>().unwrap(), Game::BrawlStars);
        assert!("fortnite".parse::<Game>().is_err());
    }

    #[test]
    fn test_serde_uses_persisted_key() {
        let json = serde_json::to_string(&Game::BrawlStars).unwrap();
        assert_eq!(json, "\"Brawl_Stars\"");
        let game: Game = serde_json::from_str("\"Clash_Of_Clans\"").unwrap();
        assert_eq!(game, Game::ClashOfClans);
    }
}
