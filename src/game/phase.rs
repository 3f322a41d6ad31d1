//! Turn phases

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};

/// Phases of a duel turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Draw,
    Standby,
    Main1,
    Battle,
    Main2,
    End,
}

impl Phase {
    /// Get the next phase in turn order
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Draw => Some(Phase::Standby),
            Phase::Standby => Some(Phase::Main1),
            Phase::Main1 => Some(Phase::Battle),
            Phase::Battle => Some(Phase::Main2),
            Phase::Main2 => Some(Phase::End),
            Phase::End => None, // End of turn
        }
    }

    /// Can spells be played from hand in this phase?
    pub fn is_main(&self) -> bool {
        matches!(self, Phase::Main1 | Phase::Main2)
    }
}

/// Current turn structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    /// Current turn number (starts at 1)
    pub turn_number: u32,

    /// Current phase
    pub phase: Phase,

    /// Active player (whose turn it is)
    pub active_player: PlayerId,
}

impl TurnState {
    pub fn new(starting_player: PlayerId) -> Self {
        TurnState {
            turn_number: 1,
            phase: Phase::Draw,
            active_player: starting_player,
        }
    }

    /// Advance to the next phase; false at end of turn
    pub fn advance_phase(&mut self) -> bool {
        if let Some(next) = self.phase.next() {
            self.phase = next;
            true
        } else {
            false
        }
    }

    /// Start a new turn
    pub fn next_turn(&mut self, next_player: PlayerId) {
        self.turn_number += 1;
        self.phase = Phase::Draw;
        self.active_player = next_player;
    }
}
