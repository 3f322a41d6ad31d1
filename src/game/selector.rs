//! Read-only card queries over the duel state
//!
//! `CardSelector` accumulates instance ids from zone accessors in canonical
//! zone order, then optionally narrows them through `CardFilter`. Everything
//! here is a pure read: selectors never mutate the store, and the order of
//! results is the store's own zone order so top-of-deck semantics survive.
//!
//! Effects use selectors both to inspect state in conditions and to build
//! candidate lists for user-selection prompts.

use crate::core::{CardInstance, InstanceId, PlayerId};
use crate::game::DuelState;
use crate::zones::Zone;

/// Builder-style zone query for one viewing player
pub struct CardSelector<'a> {
    state: &'a DuelState,
    viewer: PlayerId,
    list: Vec<InstanceId>,
}

impl<'a> CardSelector<'a> {
    pub fn new(state: &'a DuelState, viewer: PlayerId) -> Self {
        CardSelector {
            state,
            viewer,
            list: Vec::new(),
        }
    }

    fn append_zone(mut self, player: PlayerId, zone: Zone) -> Self {
        if let Some(zones) = self.state.get_player_zones(player) {
            self.list.extend_from_slice(&zones.get_zone(zone).cards);
        }
        self
    }

    pub fn deck(self) -> Self {
        let viewer = self.viewer;
        self.append_zone(viewer, Zone::Deck)
    }

    pub fn hand(self) -> Self {
        let viewer = self.viewer;
        self.append_zone(viewer, Zone::Hand)
    }

    pub fn monster_field(self) -> Self {
        let viewer = self.viewer;
        self.append_zone(viewer, Zone::MonsterField)
    }

    pub fn spell_trap_field(self) -> Self {
        let viewer = self.viewer;
        self.append_zone(viewer, Zone::SpellTrapField)
    }

    pub fn field_zone(self) -> Self {
        let viewer = self.viewer;
        self.append_zone(viewer, Zone::FieldZone)
    }

    pub fn graveyard(self) -> Self {
        let viewer = self.viewer;
        self.append_zone(viewer, Zone::Graveyard)
    }

    pub fn banished(self) -> Self {
        let viewer = self.viewer;
        self.append_zone(viewer, Zone::Banished)
    }

    pub fn extra_deck(self) -> Self {
        let viewer = self.viewer;
        self.append_zone(viewer, Zone::ExtraDeck)
    }

    /// The opponent's field spell zone
    pub fn opponent_field_zone(self) -> Self {
        match self.state.get_other_player_id(self.viewer) {
            Some(opponent) => self.append_zone(opponent, Zone::FieldZone),
            None => self,
        }
    }

    /// Every spell/trap the viewer controls plus both field zones
    pub fn all_field_spell_trap(self) -> Self {
        let viewer = self.viewer;
        self.opponent_field_zone()
            .append_zone(viewer, Zone::FieldZone)
            .append_zone(viewer, Zone::SpellTrapField)
    }

    /// Narrow the accumulated list
    pub fn filter(self) -> CardFilter<'a> {
        CardFilter {
            state: self.state,
            list: self.list,
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Materialize the ordered id sequence
    pub fn ids(self) -> Vec<InstanceId> {
        self.list
    }

    /// Materialize the ordered instances
    pub fn get(self) -> Vec<&'a CardInstance> {
        let state = self.state;
        self.list
            .into_iter()
            .filter_map(|id| state.cards.get(id).ok())
            .collect()
    }
}

/// Predicate refinement over a selector's accumulated list
pub struct CardFilter<'a> {
    state: &'a DuelState,
    list: Vec<InstanceId>,
}

impl<'a> CardFilter<'a> {
    fn retain_by(mut self, mut keep: impl FnMut(&CardInstance) -> bool) -> Self {
        let state = self.state;
        self.list
            .retain(|&id| state.cards.get(id).map(|c| keep(c)).unwrap_or(false));
        self
    }

    /// Keep instances matching an arbitrary predicate
    pub fn matching(self, predicate: impl FnMut(&CardInstance) -> bool) -> Self {
        self.retain_by(predicate)
    }

    pub fn monsters(self) -> Self {
        self.retain_by(|c| c.definition.is_monster())
    }

    pub fn spells(self) -> Self {
        self.retain_by(|c| c.definition.is_spell())
    }

    pub fn traps(self) -> Self {
        self.retain_by(|c| c.definition.is_trap())
    }

    pub fn field_spells(self) -> Self {
        self.retain_by(|c| c.definition.is_field_spell())
    }

    /// Keep cards whose name contains `substring`
    pub fn name_contains(self, substring: &str) -> Self {
        self.retain_by(|c| c.card_name().contains(substring))
    }

    /// Drop one specific instance (typically the activated card itself)
    pub fn exclude_id(self, id: InstanceId) -> Self {
        self.retain_by(|c| c.id != id)
    }

    pub fn attack_at_most(self, attack: i32) -> Self {
        self.retain_by(|c| c.definition.attack().map(|a| a <= attack).unwrap_or(false))
    }

    pub fn level(self, level: u8) -> Self {
        self.retain_by(|c| c.definition.level() == Some(level))
    }

    pub fn level_at_most(self, level: u8) -> Self {
        self.retain_by(|c| c.definition.level().map(|l| l <= level).unwrap_or(false))
    }

    pub fn level_at_least(self, level: u8) -> Self {
        self.retain_by(|c| c.definition.level().map(|l| l >= level).unwrap_or(false))
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn ids(self) -> Vec<InstanceId> {
        self.list
    }

    pub fn get(self) -> Vec<&'a CardInstance> {
        let state = self.state;
        self.list
            .into_iter()
            .filter_map(|id| state.cards.get(id).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Attribute, CardCategory, CardDefinition, MonsterKind, MonsterStats, Race, SpellKind,
    };
    use std::sync::Arc;

    fn spell(name: &str, kind: SpellKind) -> Arc<CardDefinition> {
        Arc::new(CardDefinition::new(name, CardCategory::Spell(kind), ""))
    }

    fn monster(name: &str, attack: i32, level: u8) -> Arc<CardDefinition> {
        Arc::new(CardDefinition::new(
            name,
            CardCategory::Monster(MonsterStats {
                kind: MonsterKind::Effect,
                attribute: Attribute::Dark,
                race: Race::Fiend,
                level: Some(level),
                rank: None,
                link: None,
                attack,
                defense: Some(0),
            }),
            "",
        ))
    }

    fn setup() -> (DuelState, PlayerId) {
        let mut state = DuelState::new_two_player("Alice".into(), "Bob".into(), 8000);
        let p1 = state.players[0].id;
        state.create_instance(spell("Pot of Greed", SpellKind::Normal), p1, Zone::Deck);
        state.create_instance(spell("Chicken Game", SpellKind::Field), p1, Zone::Deck);
        state.create_instance(monster("Critter", 1000, 3), p1, Zone::Deck);
        state.create_instance(monster("Summoned Skull", 2500, 6), p1, Zone::Hand);
        (state, p1)
    }

    #[test]
    fn test_zone_accessor_order_is_zone_order() {
        let (state, p1) = setup();
        let deck_ids = state.zones(p1).deck.cards.clone();
        let ids = CardSelector::new(&state, p1).deck().ids();
        assert_eq!(ids, deck_ids);
    }

    #[test]
    fn test_filters_narrow_without_reordering() {
        let (state, p1) = setup();
        let spells = CardSelector::new(&state, p1).deck().filter().spells().get();
        assert_eq!(spells.len(), 2);
        assert_eq!(spells[0].card_name().as_str(), "Pot of Greed");

        let fields = CardSelector::new(&state, p1)
            .deck()
            .filter()
            .field_spells()
            .get();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].card_name().as_str(), "Chicken Game");
    }

    #[test]
    fn test_name_and_stat_filters() {
        let (state, p1) = setup();
        assert_eq!(
            CardSelector::new(&state, p1)
                .deck()
                .hand()
                .filter()
                .name_contains("Greed")
                .len(),
            1
        );
        assert_eq!(
            CardSelector::new(&state, p1)
                .deck()
                .hand()
                .filter()
                .monsters()
                .attack_at_most(1500)
                .len(),
            1
        );
    }

    #[test]
    fn test_exclude_id() {
        let (state, p1) = setup();
        let all = CardSelector::new(&state, p1).deck().ids();
        let without_first = CardSelector::new(&state, p1)
            .deck()
            .filter()
            .exclude_id(all[0])
            .ids();
        assert_eq!(without_first.len(), all.len() - 1);
        assert!(!without_first.contains(&all[0]));
    }

    #[test]
    fn test_empty_zones_are_fine() {
        let (state, p1) = setup();
        let sel = CardSelector::new(&state, p1).graveyard().banished();
        assert_eq!(sel.len(), 0);
        assert!(CardSelector::new(&state, p1).graveyard().get().is_empty());
    }
}
