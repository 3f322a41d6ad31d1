//! Strongly-typed wrappers for game concepts
//!
//! Newtypes prevent type confusion between the different strings the duel
//! core passes around (card names, player names, once-per-turn effect keys).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardName(String);

impl CardName {
    pub fn new(s: impl Into<String>) -> Self {
        CardName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn contains(&self, substring: &str) -> bool {
        self.0.contains(substring)
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        CardName(s)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}

/// Player name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlayerName {
    fn from(s: String) -> Self {
        PlayerName(s)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        PlayerName(s.to_string())
    }
}

/// Key identifying a once-per-turn effect in the turn memo
///
/// Defaults to the card name; cards with several restricted effects use a
/// distinct key per effect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectKey(String);

impl EffectKey {
    pub fn new(s: impl Into<String>) -> Self {
        EffectKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EffectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&CardName> for EffectKey {
    fn from(name: &CardName) -> Self {
        EffectKey(name.as_str().to_string())
    }
}

impl From<&str> for EffectKey {
    fn from(s: &str) -> Self {
        EffectKey(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_name_contains() {
        let name = CardName::new("Pot of Greed");
        assert!(name.contains("Greed"));
        assert!(!name.contains("Duality"));
    }

    #[test]
    fn test_effect_key_from_card_name() {
        let name = CardName::new("Chicken Game");
        let key = EffectKey::from(&name);
        assert_eq!(key.as_str(), "Chicken Game");
    }
}
