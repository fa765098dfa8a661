// Works out which prefixes a message may start with.

/// Prefixes accepted in development mode. Three slots so the usage hint
/// (which reads slot three) behaves the same as in production.
const DEV_PREFIXES: [&str; 3] = ["./", "./", "./"];

pub const DEFAULT_PREFIX: &str = "!";

#[derive(Debug, Clone)]
pub struct PrefixResolver {
    bot_id: u64,
    default_prefix: String,
    dev_mode: bool,
}

impl PrefixResolver {
    pub fn new(bot_id: u64, default_prefix: impl Into<String>, dev_mode: bool) -> Self {
        Self {
            bot_id,
            default_prefix: default_prefix.into(),
            dev_mode,
        }
    }

    /// Ordered candidate list: both mention forms, then the guild prefix (or
    /// the global default).
    ///
    /// Development mode ignores `guild_prefix` entirely.
    pub fn candidates(&self, guild_prefix: Option<&str>) -> Vec<String> {
        if self.dev_mode {
            return DEV_PREFIXES.iter().map(|p| p.to_string()).collect();
        }

        vec![
            format!("<@{}> ", self.bot_id),
            format!("<@!{}> ", self.bot_id),
            guild_prefix.unwrap_or(&self.default_prefix).to_string(),
        ]
    }
}

/// First candidate the content literally starts with. Case-sensitive, no
/// whitespace trimming.
pub fn match_prefix<'a>(content: &str, candidates: &'a [String]) -> Option<&'a str> {
    candidates
        .iter()
        .find(|candidate| !candidate.is_empty() && content.starts_with(candidate.as_str()))
        .map(|candidate| candidate.as_str())
}

/// Slot used by usage hints.
pub fn usage_prefix(candidates: &[String]) -> &str {
    candidates
        .get(2)
        .or_else(|| candidates.last())
        .map(|p| p.as_str())
        .unwrap_or(DEFAULT_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_order() {
        let resolver = PrefixResolver::new(42, "!", false);
        assert_eq!(resolver.candidates(None), vec!["<@42> ", "<@!42> ", "!"]);
        assert_eq!(resolver.candidates(Some("s.")), vec!["<@42> ", "<@!42> ", "s."]);
    }

    #[test]
    fn test_dev_mode_ignores_guild_prefix() {
        let resolver = PrefixResolver::new(42, "!", true);
        assert_eq!(resolver.candidates(Some("s.")), vec!["./", "./", "./"]);
    }

    #[test]
    fn test_match_prefix_is_literal() {
        let candidates = PrefixResolver::new(42, "!", false).candidates(Some("S."));
        assert_eq!(match_prefix("S.ping", &candidates), Some("S."));
        assert_eq!(match_prefix("s.ping", &candidates), None);
        assert_eq!(match_prefix(" S.ping", &candidates), None);
        assert_eq!(match_prefix("<@!42> ping", &candidates), Some("<@!42> "));
        assert_eq!(match_prefix("hello", &candidates), None);
    }

    #[test]
    fn test_usage_prefix_reads_third_slot() {
        let candidates = PrefixResolver::new(42, "!", false).candidates(Some("?"));
        assert_eq!(usage_prefix(&candidates), "?");
    }
}
