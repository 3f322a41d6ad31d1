//! Card effect hooks and the resolution completion contract
//!
//! Every card carries an effect table: a small map from trigger hook to
//! handler. Handlers are plain function pointers over the shared duel state,
//! so definitions stay cheap to clone and share.
//!
//! The `Resolve` guard is the completion half of the contract: an effect
//! body receives exactly one, and must consume it once every nested or
//! delayed sub-step it scheduled has finished. Being move-only, calling it
//! twice is unrepresentable; dropping it unfired is observable through its
//! probe for test harnesses.

use crate::core::InstanceId;
use crate::game::{DuelState, ResolutionEngine};
use smallvec::SmallVec;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Trigger points a card effect can hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectHook {
    /// Spell/trap activation
    Spell,
    /// Manually activated (ignition) effect while face-up
    Ignition,
    /// The card was summoned face-up
    Summon,
    /// The card was released (tributed)
    Release,
    /// The card left the field for the graveyard
    FieldToGraveyard,
    /// The card reached the graveyard from anywhere
    AnywhereToGraveyard,
    /// The card moved from the graveyard to the field
    GraveyardToField,
    /// Life was paid as a cost while this card is face-up
    PayLifeCost,
    /// The card was destroyed by battle
    DestroyByBattle,
    /// The card was destroyed by another effect
    DestroyByEffect,
}

impl EffectHook {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectHook::Spell => "spell",
            EffectHook::Ignition => "ignition",
            EffectHook::Summon => "summon",
            EffectHook::Release => "release",
            EffectHook::FieldToGraveyard => "field_to_graveyard",
            EffectHook::AnywhereToGraveyard => "anywhere_to_graveyard",
            EffectHook::GraveyardToField => "graveyard_to_field",
            EffectHook::PayLifeCost => "pay_life_cost",
            EffectHook::DestroyByBattle => "destroy_by_battle",
            EffectHook::DestroyByEffect => "destroy_by_effect",
        }
    }
}

impl fmt::Display for EffectHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gate: may this effect legally start right now?
pub type ConditionFn = fn(&DuelState, InstanceId) -> bool;

/// Cost payment. Returns false to refuse; must not mutate state in that case.
pub type CostFn = fn(&mut DuelState, InstanceId) -> bool;

/// Effect body. Must consume `resolve` exactly once, after all sub-steps.
pub type BodyFn = fn(&mut DuelState, &mut ResolutionEngine, InstanceId, Resolve);

/// One hook's handler: condition gate, optional cost, body
#[derive(Debug, Clone, Copy)]
pub struct EffectHandler {
    pub condition: ConditionFn,
    pub pay_cost: Option<CostFn>,
    pub body: BodyFn,
}

impl EffectHandler {
    pub fn new(condition: ConditionFn, body: BodyFn) -> Self {
        EffectHandler {
            condition,
            pay_cost: None,
            body,
        }
    }

    pub fn with_cost(mut self, cost: CostFn) -> Self {
        self.pay_cost = Some(cost);
        self
    }
}

/// A card's effect table
///
/// Cards hook one or two triggers in practice, so a small inline vec with
/// linear scan beats a map here.
#[derive(Debug, Clone, Default)]
pub struct CardEffects {
    handlers: SmallVec<[(EffectHook, EffectHandler); 2]>,
}

impl CardEffects {
    pub fn new() -> Self {
        CardEffects::default()
    }

    /// Builder-style registration
    pub fn on(mut self, hook: EffectHook, handler: EffectHandler) -> Self {
        debug_assert!(
            !self.has(hook),
            "duplicate handler registered for hook {hook}"
        );
        self.handlers.push((hook, handler));
        self
    }

    pub fn get(&self, hook: EffectHook) -> Option<&EffectHandler> {
        self.handlers.iter().find(|(h, _)| *h == hook).map(|(_, e)| e)
    }

    pub fn has(&self, hook: EffectHook) -> bool {
        self.get(hook).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Completion state observed through a `ResolveProbe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveState {
    /// The guard is still held by some continuation
    Pending,
    /// The body (or a continuation) consumed the guard
    Fired,
    /// The guard was destroyed without firing
    Dropped,
}

/// Shared observer for a `Resolve` guard's fate
#[derive(Debug, Clone)]
pub struct ResolveProbe(Rc<Cell<ResolveState>>);

impl ResolveProbe {
    pub fn state(&self) -> ResolveState {
        self.0.get()
    }

    pub fn is_fired(&self) -> bool {
        self.state() == ResolveState::Fired
    }
}

/// Single-shot completion guard handed to an effect body
///
/// Move-only: invoking consumes the guard, so a double call does not
/// compile. The paired probe outlives it for harness checks.
pub struct Resolve {
    card: InstanceId,
    state: Rc<Cell<ResolveState>>,
    on_resolved: Option<Box<dyn FnOnce(&mut DuelState, InstanceId)>>,
}

impl Resolve {
    /// Create a guard and its observer probe. `on_resolved` runs when the
    /// guard fires; it is how the duel orchestrator learns the effect's
    /// full resolution (nested steps included) is complete.
    pub fn new(
        card: InstanceId,
        on_resolved: impl FnOnce(&mut DuelState, InstanceId) + 'static,
    ) -> (Self, ResolveProbe) {
        let state = Rc::new(Cell::new(ResolveState::Pending));
        let probe = ResolveProbe(Rc::clone(&state));
        (
            Resolve {
                card,
                state,
                on_resolved: Some(Box::new(on_resolved)),
            },
            probe,
        )
    }

    /// A guard whose completion nobody observes (fire-and-forget triggers)
    pub fn detached(card: InstanceId) -> (Self, ResolveProbe) {
        Resolve::new(card, |_, _| {})
    }

    /// Signal that the effect's resolution is complete
    pub fn invoke(mut self, state: &mut DuelState) {
        self.state.set(ResolveState::Fired);
        if let Some(callback) = self.on_resolved.take() {
            callback(state, self.card);
        }
    }

    pub fn card(&self) -> InstanceId {
        self.card
    }
}

impl Drop for Resolve {
    fn drop(&mut self) {
        if self.state.get() == ResolveState::Pending {
            self.state.set(ResolveState::Dropped);
        }
    }
}

impl fmt::Debug for Resolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolve")
            .field("card", &self.card)
            .field("state", &self.state.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use crate::game::DuelState;

    fn always(_: &DuelState, _: InstanceId) -> bool {
        true
    }

    fn noop_body(state: &mut DuelState, _: &mut ResolutionEngine, _: InstanceId, resolve: Resolve) {
        resolve.invoke(state);
    }

    #[test]
    fn test_effect_table_lookup() {
        let effects = CardEffects::new().on(EffectHook::Spell, EffectHandler::new(always, noop_body));

        assert!(effects.has(EffectHook::Spell));
        assert!(!effects.has(EffectHook::Summon));
        assert!(effects.get(EffectHook::Spell).unwrap().pay_cost.is_none());
    }

    #[test]
    fn test_resolve_fires_once() {
        let mut state = DuelState::new_two_player("a".into(), "b".into(), 8000);
        let (resolve, probe) = Resolve::detached(EntityId::new(0));

        assert_eq!(probe.state(), ResolveState::Pending);
        resolve.invoke(&mut state);
        assert_eq!(probe.state(), ResolveState::Fired);
    }

    #[test]
    fn test_resolve_dropped_unfired_is_observable() {
        let (resolve, probe) = Resolve::detached(EntityId::new(0));
        drop(resolve);
        assert_eq!(probe.state(), ResolveState::Dropped);
    }
}
