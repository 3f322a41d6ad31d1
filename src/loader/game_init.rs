//! Duel initialization from deck lists

use crate::game::{movement, DuelState};
use crate::loader::{CardLibrary, DeckList};
use crate::zones::Zone;
use crate::{DuelError, Result};

/// Starting conditions for a duel
#[derive(Debug, Clone, Copy)]
pub struct DuelConfig {
    pub starting_life: i32,
    pub opening_hand: usize,
    pub seed: u64,
}

impl Default for DuelConfig {
    fn default() -> Self {
        DuelConfig {
            starting_life: 8000,
            opening_hand: 5,
            seed: 0,
        }
    }
}

/// Builds a ready-to-play duel state from deck lists and a card library
pub struct GameInitializer<'a> {
    library: &'a CardLibrary,
}

impl<'a> GameInitializer<'a> {
    pub fn new(library: &'a CardLibrary) -> Self {
        GameInitializer { library }
    }

    /// Create a two-player duel: instantiate decks, shuffle, draw opening
    /// hands
    pub fn init_duel(
        &self,
        player1_name: &str,
        deck1: &DeckList,
        player2_name: &str,
        deck2: &DeckList,
        config: DuelConfig,
    ) -> Result<DuelState> {
        let mut state = DuelState::new_two_player(
            player1_name.to_string(),
            player2_name.to_string(),
            config.starting_life,
        );
        state.seed_rng(config.seed);

        let player_ids: Vec<_> = state.players.iter().map(|p| p.id).collect();
        for (player_id, deck) in player_ids.iter().zip([deck1, deck2]) {
            self.instantiate_deck(&mut state, *player_id, deck)?;
            state.shuffle_deck(*player_id);
        }

        for player_id in player_ids {
            for _ in 0..config.opening_hand {
                movement::draw_top(&mut state, player_id)?;
            }
        }

        state.verify_zone_integrity()?;
        Ok(state)
    }

    fn instantiate_deck(
        &self,
        state: &mut DuelState,
        player_id: crate::core::PlayerId,
        deck: &DeckList,
    ) -> Result<()> {
        for (entries, zone) in [(&deck.main, Zone::Deck), (&deck.extra, Zone::ExtraDeck)] {
            for entry in entries.iter() {
                let definition = self.library.get(&entry.card).ok_or_else(|| {
                    DuelError::InvalidDeckFormat(format!(
                        "deck '{}' references unknown card '{}'",
                        deck.name, entry.card
                    ))
                })?;
                for _ in 0..entry.count {
                    state.create_instance(definition.clone(), player_id, zone);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{DeckEntry, DeckLoader};

    fn demo_deck() -> DeckList {
        DeckList {
            name: "Demo".to_string(),
            main: vec![
                DeckEntry {
                    card: "Pot of Greed".to_string(),
                    count: 3,
                },
                DeckEntry {
                    card: "Critter".to_string(),
                    count: 3,
                },
                DeckEntry {
                    card: "Summoned Skull".to_string(),
                    count: 4,
                },
            ],
            extra: Vec::new(),
        }
    }

    #[test]
    fn test_init_duel_draws_opening_hands() {
        let library = CardLibrary::with_builtin_cards();
        let deck = demo_deck();
        let state = GameInitializer::new(&library)
            .init_duel("Alice", &deck, "Bob", &deck, DuelConfig::default())
            .unwrap();

        for player in &state.players {
            assert_eq!(state.zones(player.id).hand.len(), 5);
            assert_eq!(state.zones(player.id).deck.len(), 5);
            assert_eq!(player.life, 8000);
        }
        state.verify_zone_integrity().unwrap();
    }

    #[test]
    fn test_same_seed_same_deck_order() {
        let library = CardLibrary::with_builtin_cards();
        let deck = demo_deck();
        let init = GameInitializer::new(&library);
        let config = DuelConfig {
            seed: 99,
            ..DuelConfig::default()
        };

        let a = init.init_duel("Alice", &deck, "Bob", &deck, config).unwrap();
        let b = init.init_duel("Alice", &deck, "Bob", &deck, config).unwrap();

        let p1 = a.players[0].id;
        let names = |state: &DuelState| {
            state
                .zones(p1)
                .deck
                .cards
                .iter()
                .map(|&id| state.instance(id).unwrap().card_name().as_str().to_string())
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&a), names(&b));
    }

    #[test]
    fn test_unknown_card_is_rejected() {
        let library = CardLibrary::with_builtin_cards();
        let deck = DeckLoader::parse(r#"{"name": "Bad", "main": [{"card": "Nonexistent"}]}"#).unwrap();
        let err = GameInitializer::new(&library)
            .init_duel("Alice", &deck, "Bob", &deck, DuelConfig::default())
            .unwrap_err();
        assert!(matches!(err, DuelError::InvalidDeckFormat(_)));
    }
}
