//! Card movement operations
//!
//! The only sanctioned way zone membership changes. Each operation removes
//! the instance from the zone collection it currently occupies, appends it
//! to the destination per that zone's convention, and updates the instance
//! record to match, leaving the store fully consistent before returning.
//!
//! Moving an instance that is no longer where its record claims signals
//! `DuelError::StaleReference`; nothing is mutated in that case. Nested
//! effect steps routinely invalidate captured references, so resolution
//! code degrades that error to a logged no-op.

use crate::core::{InstanceId, PlayerId, Position, SummonKind};
use crate::game::DuelState;
use crate::zones::Zone;
use crate::{DuelError, Result};

/// Where in the deck a card lands when sent there
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeckSide {
    #[default]
    Top,
    Bottom,
}

/// Placement options for `send_card_with`
#[derive(Debug, Clone, Copy, Default)]
pub struct SendOptions {
    /// Place the card face-down ("set")
    pub face_down: bool,
    /// Deck placement side (ignored for other destinations)
    pub deck_side: DeckSide,
}

/// Move a card to a zone with default placement
pub fn send_card(state: &mut DuelState, id: InstanceId, to: Zone) -> Result<Zone> {
    send_card_with(state, id, to, SendOptions::default())
}

/// Move a card to a zone
///
/// Returns the zone the card left. The destination's convention decides
/// placement: graveyard/hand append, deck placement follows
/// `options.deck_side`, the field spell zone evicts its occupant to the
/// graveyard first.
pub fn send_card_with(
    state: &mut DuelState,
    id: InstanceId,
    to: Zone,
    options: SendOptions,
) -> Result<Zone> {
    let (owner, from) = {
        let instance = state.instance(id)?;
        (instance.owner, instance.zone)
    };

    // Stale check before any mutation: a rejected move must change nothing.
    if !state.zones(owner).get_zone(from).contains(id) {
        return Err(DuelError::StaleReference(id.as_u32()));
    }

    // The field spell zone holds one card; evict the occupant first.
    if to == Zone::FieldZone {
        let occupant = state.zones(owner).field_zone.peek_top();
        if let Some(occupant) = occupant {
            if occupant != id {
                send_card(state, occupant, Zone::Graveyard)?;
            }
        }
    }

    state.zones_mut(owner).get_zone_mut(from).remove(id);

    {
        let destination = state.zones_mut(owner).get_zone_mut(to);
        match to {
            Zone::Deck => match options.deck_side {
                DeckSide::Top => destination.add(id),
                DeckSide::Bottom => destination.add_to_bottom(id),
            },
            _ => destination.add(id),
        }
    }

    {
        let turn = state.turn.turn_number;
        let instance = state.instance_mut(id)?;
        instance.zone = to;
        instance.position = match to {
            Zone::SpellTrapField | Zone::FieldZone => {
                if options.face_down {
                    Some(Position::FaceDown)
                } else {
                    Some(Position::Attack)
                }
            }
            Zone::MonsterField => instance.position,
            _ => None,
        };
        instance.set_turn = if to.is_field() && options.face_down {
            Some(turn)
        } else {
            None
        };
        if !to.is_field() {
            instance.summoned_by = None;
        }
    }

    let name = state.instance(id)?.card_name().clone();
    state.logger.log_with_category(
        crate::game::VerbosityLevel::Normal,
        format!("{name} moved from {from:?} to {to:?}"),
        Some("movement"),
    );

    debug_assert!(
        state.verify_zone_integrity().is_ok(),
        "zone integrity broken after moving {id}"
    );

    Ok(from)
}

/// Place a monster on the field in the given position
pub fn summon(
    state: &mut DuelState,
    id: InstanceId,
    position: Position,
    kind: SummonKind,
) -> Result<()> {
    let (owner, from) = {
        let instance = state.instance(id)?;
        (instance.owner, instance.zone)
    };

    let removed = state.zones_mut(owner).get_zone_mut(from).remove(id);
    if !removed {
        return Err(DuelError::StaleReference(id.as_u32()));
    }
    state.zones_mut(owner).monster_field.add(id);

    {
        let instance = state.instance_mut(id)?;
        instance.zone = Zone::MonsterField;
        instance.position = Some(position);
        instance.summoned_by = Some(kind);
    }

    let name = state.instance(id)?.card_name().clone();
    state.logger.log_with_category(
        crate::game::VerbosityLevel::Normal,
        format!("{name} summoned in {position:?}"),
        Some("movement"),
    );

    debug_assert!(
        state.verify_zone_integrity().is_ok(),
        "zone integrity broken after summoning {id}"
    );

    Ok(())
}

/// Place a field spell face-up in the field zone
///
/// An existing field spell is sent to the graveyard first (the zone holds
/// one card).
pub fn activate_field_spell(state: &mut DuelState, id: InstanceId) -> Result<Zone> {
    send_card(state, id, Zone::FieldZone)
}

/// Set a spell/trap face-down, recording the turn for activation legality
pub fn set_spell_trap(state: &mut DuelState, id: InstanceId) -> Result<Zone> {
    send_card_with(
        state,
        id,
        Zone::SpellTrapField,
        SendOptions {
            face_down: true,
            ..SendOptions::default()
        },
    )
}

/// Release (tribute) a monster to the graveyard
pub fn release(state: &mut DuelState, id: InstanceId) -> Result<Zone> {
    send_card(state, id, Zone::Graveyard)
}

/// Banish a card
pub fn banish(state: &mut DuelState, id: InstanceId) -> Result<Zone> {
    send_card(state, id, Zone::Banished)
}

/// Draw the deck's top card into the hand; None if the deck is empty
///
/// Losing the duel on an empty-deck draw is the turn loop's rule, not this
/// primitive's.
pub fn draw_top(state: &mut DuelState, player: PlayerId) -> Result<Option<InstanceId>> {
    let top = state.zones(player).deck.peek_top();
    match top {
        Some(id) => {
            send_card(state, id, Zone::Hand)?;
            Ok(Some(id))
        }
        None => Ok(None),
    }
}
