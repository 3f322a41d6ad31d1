//! Loading authored data: card records, deck lists, duel setup

pub mod card;
pub mod deck;
pub mod game_init;

pub use card::{normalize_name, CardLibrary, CardRecord};
pub use deck::{DeckEntry, DeckList, DeckLoader};
pub use game_init::{DuelConfig, GameInitializer};
