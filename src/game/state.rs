//! Main duel state structure

use crate::core::{
    CardInstance, EffectKey, EntityId, EntityStore, InstanceId, Player, PlayerId,
};
use crate::game::{DuelLogger, TurnState};
use crate::zones::{PlayerZones, Zone};
use crate::{DuelError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::sync::Arc;

/// Complete duel state
///
/// The single source of truth for zones, life points and turn metadata.
/// Every component reads and writes this one aggregate; effects must observe
/// the cumulative result of previously executed nested effects, so nothing
/// ever works on a private copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuelState {
    /// All card instances in the duel
    pub cards: EntityStore<CardInstance>,

    /// All players (Vec for stable ordering, small count)
    pub players: Vec<Player>,

    /// Zones for each player
    pub player_zones: Vec<(PlayerId, PlayerZones)>,

    /// Turn structure
    pub turn: TurnState,

    /// Random number generator for shuffles (serializable for deterministic
    /// replay). RefCell so the RNG stays usable while the state is borrowed
    /// immutably for read-only views.
    pub rng: RefCell<ChaCha12Rng>,

    /// Once-per-turn effect memo, cleared at turn start
    used_once_effects: FxHashSet<EffectKey>,

    /// Unified entity ID generator (shared across all entity types)
    next_entity_id: u32,

    /// Centralized logger for duel events
    #[serde(skip)]
    pub logger: DuelLogger,
}

impl DuelState {
    /// Create a new duel with two players
    pub fn new_two_player(player1_name: String, player2_name: String, starting_life: i32) -> Self {
        let mut next_id = 0;

        let p1_id = PlayerId::new(next_id);
        next_id += 1;
        let p2_id = PlayerId::new(next_id);
        next_id += 1;

        let player1 = Player::new(p1_id, player1_name, starting_life);
        let player2 = Player::new(p2_id, player2_name, starting_life);

        DuelState {
            cards: EntityStore::new(),
            players: vec![player1, player2],
            player_zones: vec![(p1_id, PlayerZones::new(p1_id)), (p2_id, PlayerZones::new(p2_id))],
            turn: TurnState::new(p1_id),
            rng: RefCell::new(ChaCha12Rng::seed_from_u64(0)),
            used_once_effects: FxHashSet::default(),
            next_entity_id: next_id,
            logger: DuelLogger::new(),
        }
    }

    /// Set the RNG seed for deterministic duels
    pub fn seed_rng(&mut self, seed: u64) {
        *self.rng.borrow_mut() = ChaCha12Rng::seed_from_u64(seed);
    }

    /// Shuffle a player's deck using the duel's RNG
    pub fn shuffle_deck(&mut self, player_id: PlayerId) {
        use rand::seq::SliceRandom;
        if let Some(zones) = self
            .player_zones
            .iter_mut()
            .find(|(id, _)| *id == player_id)
            .map(|(_, z)| z)
        {
            zones.deck.cards.shuffle(&mut *self.rng.borrow_mut());
        }
    }

    /// Get next entity ID (unified across all entity types)
    pub fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Create a card instance from a definition and place it in `zone`
    pub fn create_instance(
        &mut self,
        definition: Arc<crate::core::CardDefinition>,
        owner: PlayerId,
        zone: Zone,
    ) -> InstanceId {
        let id = self.next_id();
        let mut instance = CardInstance::new(id, definition, owner);
        instance.zone = zone;
        self.cards.insert(id, instance);
        self.zones_mut(owner).get_zone_mut(zone).add(id);
        id
    }

    /// Get player zones for a specific player
    pub fn get_player_zones(&self, player_id: PlayerId) -> Option<&PlayerZones> {
        self.player_zones
            .iter()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
    }

    /// Get mutable player zones for a specific player
    pub fn get_player_zones_mut(&mut self, player_id: PlayerId) -> Option<&mut PlayerZones> {
        self.player_zones
            .iter_mut()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
    }

    /// Zones of a player known to exist (duels always have both players)
    pub fn zones(&self, player_id: PlayerId) -> &PlayerZones {
        self.get_player_zones(player_id)
            .expect("player zones exist for every duel player")
    }

    pub fn zones_mut(&mut self, player_id: PlayerId) -> &mut PlayerZones {
        self.get_player_zones_mut(player_id)
            .expect("player zones exist for every duel player")
    }

    /// Get a player by ID
    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(DuelError::EntityNotFound(id.as_u32()))
    }

    /// Get a mutable player by ID
    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(DuelError::EntityNotFound(id.as_u32()))
    }

    /// For 2-player duels, get the other player's ID
    pub fn get_other_player_id(&self, player_id: PlayerId) -> Option<PlayerId> {
        if self.players.len() == 2 {
            self.players.iter().find(|p| p.id != player_id).map(|p| p.id)
        } else {
            None
        }
    }

    /// Get a card instance by ID
    pub fn instance(&self, id: InstanceId) -> Result<&CardInstance> {
        self.cards.get(id)
    }

    /// Get a mutable card instance by ID
    pub fn instance_mut(&mut self, id: InstanceId) -> Result<&mut CardInstance> {
        self.cards.get_mut(id)
    }

    // --- once-per-turn effect memo ---

    pub fn mark_effect_used(&mut self, key: EffectKey) {
        self.used_once_effects.insert(key);
    }

    pub fn effect_used_this_turn(&self, key: &EffectKey) -> bool {
        self.used_once_effects.contains(key)
    }

    /// Begin the next turn: flip the active player, clear per-turn memos
    pub fn begin_turn(&mut self) {
        let next_player = self
            .get_other_player_id(self.turn.active_player)
            .unwrap_or(self.turn.active_player);
        self.turn.next_turn(next_player);
        self.used_once_effects.clear();
        for player in &mut self.players {
            player.reset_normal_summons();
        }
    }

    /// Check the one-zone-membership invariant for every instance
    ///
    /// Each instance must appear in exactly one zone collection, and that
    /// collection must be the zone its record claims. Movement is the only
    /// mutator, so a violation is a programming error; debug builds assert
    /// on it after every move.
    pub fn verify_zone_integrity(&self) -> Result<()> {
        let mut seen: FxHashMap<InstanceId, (PlayerId, Zone)> = FxHashMap::default();

        for (player_id, zones) in &self.player_zones {
            for zone in Zone::ALL {
                for &id in &zones.get_zone(zone).cards {
                    if let Some((other_player, other_zone)) = seen.insert(id, (*player_id, zone)) {
                        return Err(DuelError::InvalidAction(format!(
                            "instance {id} appears in {other_zone:?} of player {other_player} and {zone:?} of player {player_id}"
                        )));
                    }
                    let instance = self.cards.get(id)?;
                    if instance.zone != zone {
                        return Err(DuelError::InvalidAction(format!(
                            "instance {id} claims zone {:?} but lives in {zone:?}",
                            instance.zone
                        )));
                    }
                }
            }
        }

        for (id, _) in self.cards.iter() {
            if !seen.contains_key(id) {
                return Err(DuelError::InvalidAction(format!(
                    "instance {id} is in the store but in no zone collection"
                )));
            }
        }

        Ok(())
    }
}
