//! Game zones (Deck, Hand, Monster Field, Graveyard, etc.)

use crate::core::{InstanceId, PlayerId};
use serde::{Deserialize, Serialize};

/// Different zones where card instances can exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    MonsterField,
    SpellTrapField,
    FieldZone,
    Graveyard,
    Banished,
    ExtraDeck,
}

impl Zone {
    /// All zones in canonical iteration order
    pub const ALL: [Zone; 8] = [
        Zone::Deck,
        Zone::Hand,
        Zone::MonsterField,
        Zone::SpellTrapField,
        Zone::FieldZone,
        Zone::Graveyard,
        Zone::Banished,
        Zone::ExtraDeck,
    ];

    /// Is this one of the on-field zones?
    pub fn is_field(&self) -> bool {
        matches!(self, Zone::MonsterField | Zone::SpellTrapField | Zone::FieldZone)
    }
}

/// A zone containing card instances
///
/// Order always matters: the deck's top is the last element, and prompts
/// offer candidates in zone order, so nothing here ever re-sorts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    /// Zone type
    pub zone_type: Zone,

    /// Owner of this zone (each player has their own zones)
    pub owner: PlayerId,

    /// Cards in this zone, bottom-to-top
    pub cards: Vec<InstanceId>,
}

impl CardZone {
    pub fn new(zone_type: Zone, owner: PlayerId) -> Self {
        CardZone {
            zone_type,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, id: InstanceId) {
        self.cards.push(id);
    }

    pub fn remove(&mut self, id: InstanceId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&c| c == id) {
            // remove() instead of swap_remove() even where order looks
            // irrelevant: iteration order feeds prompts and replays, so it
            // must stay deterministic.
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.cards.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from top (for Deck)
    pub fn draw_top(&mut self) -> Option<InstanceId> {
        self.cards.pop()
    }

    /// Look at top card without removing it
    pub fn peek_top(&self) -> Option<InstanceId> {
        self.cards.last().copied()
    }

    /// Add to bottom (for Deck)
    pub fn add_to_bottom(&mut self, id: InstanceId) {
        self.cards.insert(0, id);
    }

    /// Shuffle the zone (for Deck)
    pub fn shuffle(&mut self, rng: &mut impl rand::Rng) {
        use rand::seq::SliceRandom;
        self.cards.shuffle(rng);
    }

    /// Clear all cards
    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

/// Collection of all zones for a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub deck: CardZone,
    pub hand: CardZone,
    pub monster_field: CardZone,
    pub spell_trap_field: CardZone,
    pub field_zone: CardZone,
    pub graveyard: CardZone,
    pub banished: CardZone,
    pub extra_deck: CardZone,
}

impl PlayerZones {
    pub fn new(player_id: PlayerId) -> Self {
        PlayerZones {
            deck: CardZone::new(Zone::Deck, player_id),
            hand: CardZone::new(Zone::Hand, player_id),
            monster_field: CardZone::new(Zone::MonsterField, player_id),
            spell_trap_field: CardZone::new(Zone::SpellTrapField, player_id),
            field_zone: CardZone::new(Zone::FieldZone, player_id),
            graveyard: CardZone::new(Zone::Graveyard, player_id),
            banished: CardZone::new(Zone::Banished, player_id),
            extra_deck: CardZone::new(Zone::ExtraDeck, player_id),
        }
    }

    pub fn get_zone(&self, zone: Zone) -> &CardZone {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::MonsterField => &self.monster_field,
            Zone::SpellTrapField => &self.spell_trap_field,
            Zone::FieldZone => &self.field_zone,
            Zone::Graveyard => &self.graveyard,
            Zone::Banished => &self.banished,
            Zone::ExtraDeck => &self.extra_deck,
        }
    }

    pub fn get_zone_mut(&mut self, zone: Zone) -> &mut CardZone {
        match zone {
            Zone::Deck => &mut self.deck,
            Zone::Hand => &mut self.hand,
            Zone::MonsterField => &mut self.monster_field,
            Zone::SpellTrapField => &mut self.spell_trap_field,
            Zone::FieldZone => &mut self.field_zone,
            Zone::Graveyard => &mut self.graveyard,
            Zone::Banished => &mut self.banished,
            Zone::ExtraDeck => &mut self.extra_deck,
        }
    }
}
