//! Card definitions and runtime card instances
//!
//! A `CardDefinition` is the immutable authored record shared by every copy
//! of the same named card. A `CardInstance` is one physical card during a
//! duel: it tracks identity, zone, position and ownership on top of its
//! definition.

use crate::core::{CardEffects, CardName, EntityId, GameEntity, Player};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Id of a card instance
pub type InstanceId = EntityId<CardInstance>;

/// Id of a player
pub type PlayerId = EntityId<Player>;

/// Monster attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attribute {
    Dark,
    Light,
    Fire,
    Water,
    Wind,
    Earth,
    Divine,
}

/// Monster races (types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Race {
    Spellcaster,
    Machine,
    WingedBeast,
    Fiend,
    Fairy,
    Warrior,
    Cyberse,
    Rock,
    Insect,
    Dragon,
    Beast,
    Aqua,
}

/// How a monster is summoned from the extra deck / main deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterKind {
    Normal,
    Effect,
    Ritual,
    Fusion,
    Synchro,
    Xyz,
    Link,
}

/// Spell card subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellKind {
    Normal,
    QuickPlay,
    Continuous,
    Field,
    Equip,
    Ritual,
}

/// Trap card subtypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapKind {
    Normal,
    Continuous,
    Counter,
}

/// Category-specific monster stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterStats {
    pub kind: MonsterKind,
    pub attribute: Attribute,
    pub race: Race,
    /// Level for main-deck monsters, rank for Xyz, link rating for Link
    pub level: Option<u8>,
    pub rank: Option<u8>,
    pub link: Option<u8>,
    pub attack: i32,
    /// Link monsters have no defense
    pub defense: Option<i32>,
}

/// The three card categories with their specific attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CardCategory {
    Monster(MonsterStats),
    Spell(SpellKind),
    Trap(TrapKind),
}

/// Battle position / face of a card instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Attack,
    Defense,
    FaceDown,
    FaceDownDefense,
}

impl Position {
    pub fn is_face_down(&self) -> bool {
        matches!(self, Position::FaceDown | Position::FaceDownDefense)
    }
}

/// How a monster arrived on the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummonKind {
    Normal,
    Special,
}

/// Immutable authored card definition, shared by all copies of the card
///
/// The data half is serializable; effect handlers are code and get attached
/// from the script registry after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDefinition {
    pub name: CardName,
    pub category: CardCategory,
    /// Free-text rules description
    pub text: String,
    #[serde(skip)]
    pub effects: CardEffects,
}

impl CardDefinition {
    pub fn new(name: impl Into<CardName>, category: CardCategory, text: impl Into<String>) -> Self {
        CardDefinition {
            name: name.into(),
            category,
            text: text.into(),
            effects: CardEffects::default(),
        }
    }

    pub fn with_effects(mut self, effects: CardEffects) -> Self {
        self.effects = effects;
        self
    }

    pub fn is_monster(&self) -> bool {
        matches!(self.category, CardCategory::Monster(_))
    }

    pub fn is_spell(&self) -> bool {
        matches!(self.category, CardCategory::Spell(_))
    }

    pub fn is_trap(&self) -> bool {
        matches!(self.category, CardCategory::Trap(_))
    }

    pub fn is_field_spell(&self) -> bool {
        matches!(self.category, CardCategory::Spell(SpellKind::Field))
    }

    pub fn monster_stats(&self) -> Option<&MonsterStats> {
        match &self.category {
            CardCategory::Monster(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn attack(&self) -> Option<i32> {
        self.monster_stats().map(|s| s.attack)
    }

    pub fn level(&self) -> Option<u8> {
        self.monster_stats().and_then(|s| s.level)
    }
}

/// One physical card during a duel
///
/// Invariant: `zone` always agrees with the zone collections in the state
/// store. Movement operations are the only code that changes either side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique ID for this card instance
    pub id: InstanceId,

    /// Shared immutable definition
    pub definition: Arc<CardDefinition>,

    /// Player who owns the card (deck it came from)
    pub owner: PlayerId,

    /// Player currently controlling the card
    pub controller: PlayerId,

    /// Zone this instance currently occupies
    pub zone: crate::zones::Zone,

    /// Battle position; None outside the field
    pub position: Option<Position>,

    /// Turn number the card was set, if it was set (trap legality)
    pub set_turn: Option<u32>,

    /// How the card was summoned, if it is a summoned monster
    pub summoned_by: Option<SummonKind>,
}

impl CardInstance {
    pub fn new(id: InstanceId, definition: Arc<CardDefinition>, owner: PlayerId) -> Self {
        CardInstance {
            id,
            definition,
            owner,
            controller: owner,
            zone: crate::zones::Zone::Deck,
            position: None,
            set_turn: None,
            summoned_by: None,
        }
    }

    pub fn card_name(&self) -> &CardName {
        &self.definition.name
    }

    pub fn is_face_down(&self) -> bool {
        self.position.map(|p| p.is_face_down()).unwrap_or(false)
    }
}

impl GameEntity<CardInstance> for CardInstance {
    fn id(&self) -> InstanceId {
        self.id
    }

    fn name(&self) -> &str {
        self.definition.name.as_str()
    }
}
