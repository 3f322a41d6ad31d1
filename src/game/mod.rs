//! Duel state, movement operations, and the effect resolution engine

pub mod dispatch;
pub mod engine;
pub mod logger;
pub mod movement;
pub mod phase;
pub mod policy;
pub mod selector;
pub mod state;

pub use dispatch::{
    activate, can_activate, fire_movement_triggers, mark_turn_once, movement_hooks,
    turn_once_condition, Activation,
};
pub use engine::{
    DelayOpts, DrawOpts, EffectOption, LifeChange, OptionRequest, PendingRequest,
    ResolutionEngine, SelectOpts, SelectionMode, SelectionRequest,
};
pub use logger::{DuelLogger, LogEntry, LogGuard, OutputMode, VerbosityLevel};
pub use movement::{
    activate_field_spell, banish, draw_top, release, send_card, send_card_with, set_spell_trap,
    summon, DeckSide, SendOptions,
};
pub use phase::{Phase, TurnState};
pub use policy::{resolve_with_policy, ChoicePolicy, FirstChoicePolicy, RandomChoicePolicy};
pub use selector::{CardFilter, CardSelector};
pub use state::DuelState;
