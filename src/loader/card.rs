//! Card record loading and the script attachment point
//!
//! Authored records carry the data half of a definition; effect handlers
//! are code and get attached from the built-in script registry when a
//! record becomes a definition. Lookup keys are normalized so Japanese,
//! romanized and differently-cased spellings of the same card all resolve.

use crate::cards;
use crate::core::{CardCategory, CardDefinition};
use crate::Result;
use deunicode::deunicode;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Normalize a card name for lookups
///
/// Transliterates Unicode to ASCII, lowercases, and collapses whitespace:
/// "強欲な壺" and "Gou Yoku na Tsubo" normalize identically.
pub fn normalize_name(name: &str) -> String {
    deunicode(name)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Authored card record: the serializable half of a definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRecord {
    pub name: String,
    pub category: CardCategory,
    #[serde(default)]
    pub text: String,
}

impl CardRecord {
    /// Build a definition, attaching script handlers if one exists
    pub fn into_definition(self) -> CardDefinition {
        let mut definition = CardDefinition::new(self.name, self.category, self.text);
        if let Some(effects) = cards::effects_for(definition.name.as_str()) {
            definition = definition.with_effects(effects);
        }
        definition
    }
}

/// Card library: shared definitions keyed by normalized name
///
/// Loaded once at startup; the engine never mutates a definition.
#[derive(Debug, Clone, Default)]
pub struct CardLibrary {
    cards: FxHashMap<String, Arc<CardDefinition>>,
}

impl CardLibrary {
    pub fn new() -> Self {
        CardLibrary::default()
    }

    /// A library preloaded with every built-in script
    pub fn with_builtin_cards() -> Self {
        let mut library = CardLibrary::new();
        for definition in cards::all_builtin() {
            library.insert(definition);
        }
        library
    }

    pub fn insert(&mut self, definition: Arc<CardDefinition>) {
        self.cards
            .insert(normalize_name(definition.name.as_str()), definition);
    }

    pub fn get(&self, name: &str) -> Option<Arc<CardDefinition>> {
        self.cards.get(&normalize_name(name)).map(Arc::clone)
    }

    /// Load a JSON array of card records, returning how many were added
    pub fn load_records(&mut self, json: &str) -> Result<usize> {
        let records: Vec<CardRecord> = serde_json::from_str(json)
            .map_err(|e| crate::DuelError::InvalidCardFormat(e.to_string()))?;
        let count = records.len();
        for record in records {
            self.insert(Arc::new(record.into_definition()));
        }
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
