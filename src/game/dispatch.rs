//! Trigger dispatch: starting card effects from game events
//!
//! The engine sequences steps; this module decides that an effect may start
//! at all. `activate` runs the handler's condition gate and cost payment
//! strictly before the body touches anything, wraps the completion contract
//! in a `Resolve` guard, and drains the engine. Movement transitions map to
//! hooks through `movement_hooks`, fired by the caller *after* the movement
//! primitive completed (movement itself never cascades).
//!
//! Once-per-turn limits live here too, backed by the state's turn memo; the
//! engine knows nothing about them.

use crate::core::{EffectHook, EffectKey, InstanceId, Resolve, ResolveProbe, ResolveState};
use crate::game::{DuelState, ResolutionEngine, VerbosityLevel};
use crate::zones::Zone;
use crate::{DuelError, Result};
use smallvec::SmallVec;

/// Outcome-carrying record of one hook invocation
#[derive(Debug)]
pub struct Activation {
    pub card: InstanceId,
    pub hook: EffectHook,
    outcome: ActivationOutcome,
}

#[derive(Debug)]
enum ActivationOutcome {
    /// Body invoked; the probe observes the resolve guard's fate
    Started {
        probe: ResolveProbe,
        /// Engine degradation count when the body started, so a later
        /// drop can be attributed to a sanctioned empty-candidate no-op
        degraded_baseline: u32,
    },
    /// Condition gate refused; nothing ran
    ConditionFailed,
    /// Cost payment refused; state untouched, surfaced as "did not occur"
    CostRefused,
}

impl Activation {
    fn new(card: InstanceId, hook: EffectHook, outcome: ActivationOutcome) -> Self {
        Activation { card, hook, outcome }
    }

    pub fn started(&self) -> bool {
        matches!(self.outcome, ActivationOutcome::Started { .. })
    }

    pub fn condition_failed(&self) -> bool {
        matches!(self.outcome, ActivationOutcome::ConditionFailed)
    }

    pub fn cost_refused(&self) -> bool {
        matches!(self.outcome, ActivationOutcome::CostRefused)
    }

    /// Has the effect's full resolution (nested steps included) completed?
    pub fn is_resolved(&self) -> bool {
        match &self.outcome {
            ActivationOutcome::Started { probe, .. } => probe.is_fired(),
            _ => false,
        }
    }

    /// Test-harness check: did resolution terminate properly?
    ///
    /// A started activation terminates by firing its resolve guard, or by
    /// the sanctioned empty-candidate degradation. Anything else — the
    /// guard still pending in a queued step, or dropped by a body that
    /// forgot to resolve — is `ResolutionNotTerminated`.
    pub fn ensure_terminated(&self, engine: &ResolutionEngine) -> Result<()> {
        match &self.outcome {
            ActivationOutcome::Started {
                probe,
                degraded_baseline,
            } => match probe.state() {
                ResolveState::Fired => Ok(()),
                ResolveState::Dropped if engine.degraded_steps() > *degraded_baseline => Ok(()),
                _ => Err(DuelError::ResolutionNotTerminated(self.card.as_u32())),
            },
            _ => Ok(()),
        }
    }
}

/// Is this hook currently activatable on this card?
///
/// Pure query: handler exists, once-per-turn memo clear, condition holds.
/// Dispatchers call this immediately before `activate`; the gap between the
/// two is zero in this single-threaded model, but `activate` re-checks
/// anyway.
pub fn can_activate(state: &DuelState, card: InstanceId, hook: EffectHook) -> bool {
    let Ok(instance) = state.instance(card) else {
        return false;
    };
    match instance.definition.effects.get(hook) {
        Some(handler) => (handler.condition)(state, card),
        None => false,
    }
}

/// Start a hook's effect: condition, cost, body, drain
///
/// Cost payment happens strictly before any mutating step of the body, so a
/// refused cost aborts the whole activation with the state unchanged. The
/// body receives a fresh `Resolve` guard and must consume it once all its
/// sub-steps complete; the returned `Activation` observes that contract.
pub fn activate(
    state: &mut DuelState,
    engine: &mut ResolutionEngine,
    card: InstanceId,
    hook: EffectHook,
) -> Result<Activation> {
    let handler = {
        let instance = state.instance(card)?;
        match instance.definition.effects.get(hook) {
            Some(handler) => *handler,
            None => {
                return Err(DuelError::NoSuchHandler {
                    card: card.as_u32(),
                    hook: hook.as_str(),
                })
            }
        }
    };

    if !(handler.condition)(state, card) {
        return Ok(Activation::new(card, hook, ActivationOutcome::ConditionFailed));
    }

    if let Some(pay_cost) = handler.pay_cost {
        if !pay_cost(state, card) {
            state.logger.log_with_category(
                VerbosityLevel::Normal,
                format!("cost refused for card {card}, effect does not occur"),
                Some("dispatch"),
            );
            return Ok(Activation::new(card, hook, ActivationOutcome::CostRefused));
        }
    }

    let degraded_baseline = engine.degraded_steps();
    let (resolve, probe) = Resolve::new(card, move |state, card| {
        state.logger.log_with_category(
            VerbosityLevel::Verbose,
            format!("effect of card {card} fully resolved"),
            Some("dispatch"),
        );
    });

    (handler.body)(state, engine, card, resolve);
    engine.run(state);

    Ok(Activation::new(
        card,
        hook,
        ActivationOutcome::Started {
            probe,
            degraded_baseline,
        },
    ))
}

/// Hooks a movement transition qualifies for, in firing order
pub fn movement_hooks(from: Zone, to: Zone) -> SmallVec<[EffectHook; 2]> {
    let mut hooks = SmallVec::new();
    if matches!(from, Zone::MonsterField | Zone::FieldZone) && to == Zone::Graveyard {
        hooks.push(EffectHook::FieldToGraveyard);
    }
    if to == Zone::Graveyard {
        hooks.push(EffectHook::AnywhereToGraveyard);
    }
    if from == Zone::Graveyard && to.is_field() {
        hooks.push(EffectHook::GraveyardToField);
    }
    hooks
}

/// Fire every hook a completed movement qualifies for
///
/// Called by the code that performed the movement, after the movement
/// primitive returned. Cards without a matching handler are skipped.
pub fn fire_movement_triggers(
    state: &mut DuelState,
    engine: &mut ResolutionEngine,
    card: InstanceId,
    from: Zone,
    to: Zone,
) -> Result<Vec<Activation>> {
    let mut activations = Vec::new();
    for hook in movement_hooks(from, to) {
        let has_handler = state
            .instance(card)
            .map(|i| i.definition.effects.has(hook))
            .unwrap_or(false);
        if has_handler {
            activations.push(activate(state, engine, card, hook)?);
        }
    }
    Ok(activations)
}

/// Default once-per-turn key: the card's name
fn default_key(state: &DuelState, card: InstanceId) -> EffectKey {
    state
        .instance(card)
        .map(|i| EffectKey::from(i.card_name()))
        .unwrap_or_else(|_| EffectKey::from(""))
}

/// Condition wrapper for once-per-turn effects
///
/// False if the keyed effect already ran this turn, otherwise defers to the
/// inner condition.
pub fn turn_once_condition(
    state: &DuelState,
    card: InstanceId,
    key: Option<EffectKey>,
    condition: impl FnOnce(&DuelState, InstanceId) -> bool,
) -> bool {
    let key = key.unwrap_or_else(|| default_key(state, card));
    if state.effect_used_this_turn(&key) {
        false
    } else {
        condition(state, card)
    }
}

/// Mark a once-per-turn effect as used; bodies call this first
pub fn mark_turn_once(state: &mut DuelState, card: InstanceId, key: Option<EffectKey>) {
    let key = key.unwrap_or_else(|| default_key(state, card));
    state.mark_effect_used(key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardCategory, CardDefinition, CardEffects, EffectHandler, SpellKind};
    use crate::game::DrawOpts;
    use std::sync::Arc;

    fn plain_def(name: &str) -> Arc<CardDefinition> {
        Arc::new(CardDefinition::new(name, CardCategory::Spell(SpellKind::Normal), ""))
    }

    fn draw_one_def(name: &str) -> Arc<CardDefinition> {
        let effects = CardEffects::new().on(
            EffectHook::Spell,
            EffectHandler::new(
                |_, _| true,
                |state, engine, card, resolve| {
                    engine.with_draw(state, card, DrawOpts { count: 1 }, move |state, _, _| {
                        resolve.invoke(state);
                    });
                },
            ),
        );
        Arc::new(
            CardDefinition::new(name, CardCategory::Spell(SpellKind::Normal), "Draw 1 card.")
                .with_effects(effects),
        )
    }

    fn refused_cost_def(name: &str) -> Arc<CardDefinition> {
        let effects = CardEffects::new().on(
            EffectHook::Spell,
            EffectHandler::new(
                |_, _| true,
                |state, _, _, resolve| resolve.invoke(state),
            )
            .with_cost(|_, _| false),
        );
        Arc::new(CardDefinition::new(name, CardCategory::Spell(SpellKind::Normal), "").with_effects(effects))
    }

    fn setup() -> (DuelState, ResolutionEngine) {
        let state = DuelState::new_two_player("Alice".into(), "Bob".into(), 8000);
        (state, ResolutionEngine::new())
    }

    #[test]
    fn test_activate_runs_body_and_resolves() {
        let (mut state, mut engine) = setup();
        let p1 = state.players[0].id;
        state.create_instance(plain_def("Filler"), p1, Zone::Deck);
        let spell = state.create_instance(draw_one_def("Draw Spell"), p1, Zone::Hand);

        let activation = activate(&mut state, &mut engine, spell, EffectHook::Spell).unwrap();
        assert!(activation.started());
        assert!(activation.is_resolved());
        activation.ensure_terminated(&engine).unwrap();
        assert_eq!(state.zones(p1).hand.len(), 2);
    }

    #[test]
    fn test_cost_refusal_leaves_state_unchanged() {
        let (mut state, mut engine) = setup();
        let p1 = state.players[0].id;
        state.create_instance(plain_def("Filler"), p1, Zone::Deck);
        let spell = state.create_instance(refused_cost_def("Costly Spell"), p1, Zone::Hand);

        let before = state.clone();
        let activation = activate(&mut state, &mut engine, spell, EffectHook::Spell).unwrap();

        assert!(activation.cost_refused());
        assert!(!activation.is_resolved());
        activation.ensure_terminated(&engine).unwrap();
        assert_eq!(state.zones(p1).deck.cards, before.zones(p1).deck.cards);
        assert_eq!(state.zones(p1).hand.cards, before.zones(p1).hand.cards);
    }

    #[test]
    fn test_missing_handler_is_an_error() {
        let (mut state, mut engine) = setup();
        let p1 = state.players[0].id;
        let card = state.create_instance(plain_def("Vanilla"), p1, Zone::Hand);

        assert!(!can_activate(&state, card, EffectHook::Spell));
        assert!(matches!(
            activate(&mut state, &mut engine, card, EffectHook::Spell),
            Err(DuelError::NoSuchHandler { .. })
        ));
    }

    #[test]
    fn test_unresolved_body_is_detected() {
        let effects = CardEffects::new().on(
            EffectHook::Spell,
            EffectHandler::new(
                |_, _| true,
                // Forgets to resolve: the guard drops at body end.
                |_, _, _, _resolve| {},
            ),
        );
        let def = Arc::new(
            CardDefinition::new("Broken Spell", CardCategory::Spell(SpellKind::Normal), "")
                .with_effects(effects),
        );

        let (mut state, mut engine) = setup();
        let p1 = state.players[0].id;
        let spell = state.create_instance(def, p1, Zone::Hand);

        let activation = activate(&mut state, &mut engine, spell, EffectHook::Spell).unwrap();
        assert!(matches!(
            activation.ensure_terminated(&engine),
            Err(DuelError::ResolutionNotTerminated(_))
        ));
    }

    #[test]
    fn test_movement_hook_mapping() {
        assert_eq!(
            movement_hooks(Zone::MonsterField, Zone::Graveyard).as_slice(),
            [EffectHook::FieldToGraveyard, EffectHook::AnywhereToGraveyard]
        );
        assert_eq!(
            movement_hooks(Zone::Hand, Zone::Graveyard).as_slice(),
            [EffectHook::AnywhereToGraveyard]
        );
        assert_eq!(
            movement_hooks(Zone::Graveyard, Zone::MonsterField).as_slice(),
            [EffectHook::GraveyardToField]
        );
        assert!(movement_hooks(Zone::Deck, Zone::Hand).is_empty());
    }

    #[test]
    fn test_turn_once_wrappers() {
        let (mut state, _) = setup();
        let p1 = state.players[0].id;
        let card = state.create_instance(plain_def("Chicken Game"), p1, Zone::Hand);

        assert!(turn_once_condition(&state, card, None, |_, _| true));
        mark_turn_once(&mut state, card, None);
        assert!(!turn_once_condition(&state, card, None, |_, _| true));

        state.begin_turn();
        assert!(turn_once_condition(&state, card, None, |_, _| true));
    }
}
