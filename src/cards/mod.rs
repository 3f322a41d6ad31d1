//! Built-in card scripts
//!
//! Card data authoring lives outside the engine; these scripts are the
//! repository's executable examples and test fixtures. Each constructor
//! returns a complete definition (record plus effect handlers); the loader
//! attaches the handlers to externally authored records by normalized name.

pub mod monsters;
pub mod spells;

use crate::core::{CardDefinition, CardEffects};
use crate::loader::normalize_name;
use std::sync::Arc;

/// Every built-in definition
pub fn all_builtin() -> Vec<Arc<CardDefinition>> {
    vec![
        spells::pot_of_greed(),
        spells::card_destruction(),
        spells::terraforming(),
        spells::chicken_game(),
        spells::premature_burial(),
        monsters::critter(),
        monsters::summoned_skull(),
        monsters::giant_soldier_of_stone(),
    ]
}

/// Effect handlers for a card name, if a script exists
///
/// Lookup is by normalized name so authored records and scripts match
/// regardless of spelling variant.
pub fn effects_for(name: &str) -> Option<CardEffects> {
    let target = normalize_name(name);
    all_builtin()
        .into_iter()
        .find(|def| normalize_name(def.name.as_str()) == target)
        .map(|def| def.effects.clone())
}
