//! Deck list loader (JSON format)

use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_count() -> u8 {
    1
}

/// One deck entry: a card name and how many copies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: String,
    #[serde(default = "default_count")]
    pub count: u8,
}

/// A deck list: main deck plus extra deck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckList {
    pub name: String,
    pub main: Vec<DeckEntry>,
    #[serde(default)]
    pub extra: Vec<DeckEntry>,
}

impl DeckList {
    /// Total cards in the main deck
    pub fn main_size(&self) -> usize {
        self.main.iter().map(|e| e.count as usize).sum()
    }
}

/// Deck loader for JSON deck files
pub struct DeckLoader;

impl DeckLoader {
    /// Load a deck from a JSON file
    pub fn load_from_file(path: &Path) -> Result<DeckList> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a deck from its JSON content
    pub fn parse(content: &str) -> Result<DeckList> {
        let deck: DeckList = serde_json::from_str(content)
            .map_err(|e| DuelError::InvalidDeckFormat(e.to_string()))?;
        if deck.main.is_empty() {
            return Err(DuelError::InvalidDeckFormat("Empty deck".to_string()));
        }
        Ok(deck)
    }

    /// Load every deck file under a directory
    ///
    /// The walk runs in a blocking task (jwalk uses rayon internally),
    /// then the files are read concurrently.
    pub async fn load_directory(dir: impl AsRef<Path>) -> Result<Vec<DeckList>> {
        let dir = dir.as_ref().to_path_buf();

        let paths: Vec<PathBuf> = tokio::task::spawn_blocking(move || {
            jwalk::WalkDir::new(&dir)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
                .collect()
        })
        .await?;

        let mut handles = Vec::with_capacity(paths.len());
        for path in paths {
            handles.push(tokio::spawn(async move {
                tokio::fs::read_to_string(&path).await
            }));
        }

        let mut decks = Vec::with_capacity(handles.len());
        for handle in handles {
            let content = handle.await??;
            decks.push(Self::parse(&content)?);
        }
        Ok(decks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEMO_DECK: &str = r#"{
        "name": "Demo",
        "main": [
            {"card": "Pot of Greed", "count": 2},
            {"card": "Critter", "count": 3},
            {"card": "Summoned Skull"}
        ]
    }"#;

    #[test]
    fn test_parse_deck() {
        let deck = DeckLoader::parse(DEMO_DECK).unwrap();
        assert_eq!(deck.name, "Demo");
        assert_eq!(deck.main.len(), 3);
        assert_eq!(deck.main_size(), 6);
        assert!(deck.extra.is_empty());
        // Omitted count defaults to one copy.
        assert_eq!(deck.main[2].count, 1);
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        let err = DeckLoader::parse(r#"{"name": "Empty", "main": []}"#).unwrap_err();
        assert!(matches!(err, DuelError::InvalidDeckFormat(_)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            DeckLoader::parse("not json"),
            Err(DuelError::InvalidDeckFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_load_directory() {
        let dir = std::env::temp_dir().join("ygo_duel_rs_deck_dir_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("demo.json"), DEMO_DECK).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let decks = DeckLoader::load_directory(&dir).await.unwrap();
        assert_eq!(decks.len(), 1);
        assert_eq!(decks[0].name, "Demo");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
