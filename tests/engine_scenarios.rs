//! End-to-end effect resolution scenarios
//!
//! These drive real card scripts through the dispatcher, the engine and the
//! movement layer, asserting on the shared state the way the duel
//! orchestrator would observe it.

use std::sync::Arc;
use ygo_duel_rs::{
    cards::{monsters, spells},
    core::{CardCategory, CardDefinition, EffectHook, InstanceId, PlayerId, SpellKind},
    game::{
        dispatch, resolve_with_policy, send_card, send_card_with, DeckSide, DuelState,
        FirstChoicePolicy, OutputMode, PendingRequest, RandomChoicePolicy, ResolutionEngine,
        SendOptions, VerbosityLevel,
    },
    zones::Zone,
    DuelError,
};

fn filler(name: &str) -> Arc<CardDefinition> {
    Arc::new(CardDefinition::new(name, CardCategory::Spell(SpellKind::Normal), ""))
}

fn new_duel() -> (DuelState, ResolutionEngine, PlayerId) {
    let mut state = DuelState::new_two_player("Alice".into(), "Bob".into(), 8000);
    state.logger.set_output_mode(OutputMode::Memory);
    state.logger.set_verbosity(VerbosityLevel::Silent);
    let p1 = state.players[0].id;
    (state, ResolutionEngine::new(), p1)
}

#[test]
fn pot_of_greed_draws_two_then_buries_itself() {
    let (mut state, mut engine, p1) = new_duel();

    // Deck bottom-to-top: c, b, a. The top two must come to hand in order.
    let c = state.create_instance(filler("C"), p1, Zone::Deck);
    let b = state.create_instance(filler("B"), p1, Zone::Deck);
    let a = state.create_instance(filler("A"), p1, Zone::Deck);
    let pot = state.create_instance(spells::pot_of_greed(), p1, Zone::Hand);

    let activation = dispatch::activate(&mut state, &mut engine, pot, EffectHook::Spell).unwrap();

    assert!(activation.started());
    // Resolve fired exactly once, after both draws and the self-bury.
    assert!(activation.is_resolved());
    activation.ensure_terminated(&engine).unwrap();
    assert!(engine.is_idle());

    assert_eq!(state.zones(p1).hand.cards, vec![a, b]);
    assert_eq!(state.zones(p1).deck.cards, vec![c]);
    assert_eq!(state.zones(p1).graveyard.cards, vec![pot]);
    state.verify_zone_integrity().unwrap();
}

#[test]
fn pot_of_greed_needs_two_cards_in_deck() {
    let (mut state, mut engine, p1) = new_duel();
    state.create_instance(filler("Only One"), p1, Zone::Deck);
    let pot = state.create_instance(spells::pot_of_greed(), p1, Zone::Hand);

    assert!(!dispatch::can_activate(&state, pot, EffectHook::Spell));
    let activation = dispatch::activate(&mut state, &mut engine, pot, EffectHook::Spell).unwrap();
    assert!(activation.condition_failed());
    assert_eq!(state.zones(p1).hand.cards, vec![pot]);
}

#[test]
fn card_destruction_discards_strictly_before_drawing() {
    let (mut state, mut engine, p1) = new_duel();
    state.logger.set_verbosity(VerbosityLevel::Verbose);

    let d1 = state.create_instance(filler("Deck 1"), p1, Zone::Deck);
    let d2 = state.create_instance(filler("Deck 2"), p1, Zone::Deck);
    let x = state.create_instance(filler("X"), p1, Zone::Hand);
    let y = state.create_instance(filler("Y"), p1, Zone::Hand);
    let cd = state.create_instance(spells::card_destruction(), p1, Zone::Hand);

    let activation = dispatch::activate(&mut state, &mut engine, cd, EffectHook::Spell).unwrap();
    assert!(activation.is_resolved());

    // Hand [X, Y] went to the graveyard preserving order, then exactly that
    // many cards were drawn, then the spell buried itself.
    assert_eq!(state.zones(p1).graveyard.cards, vec![x, y, cd]);
    assert_eq!(state.zones(p1).hand.cards, vec![d2, d1]);
    assert!(state.zones(p1).deck.is_empty());

    // The captured movement log proves the discards happened before any
    // draw, not just that the final zones look right.
    let entries = state.logger.entries();
    let moves: Vec<&str> = entries
        .iter()
        .filter(|e| e.category.as_deref() == Some("movement"))
        .map(|e| e.message.as_str())
        .collect();
    let first_discard = moves
        .iter()
        .position(|m| m.contains("X moved from Hand to Graveyard"))
        .expect("X was discarded");
    let second_discard = moves
        .iter()
        .position(|m| m.contains("Y moved from Hand to Graveyard"))
        .expect("Y was discarded");
    let first_draw = moves
        .iter()
        .position(|m| m.contains("moved from Deck to Hand"))
        .expect("a card was drawn");
    assert!(first_discard < second_discard);
    assert!(second_discard < first_draw);
}

#[test]
fn terraforming_with_no_field_spells_never_starts() {
    let (mut state, mut engine, p1) = new_duel();
    state.create_instance(filler("Normal Spell"), p1, Zone::Deck);
    state.create_instance(monsters::summoned_skull(), p1, Zone::Deck);
    let terraforming = state.create_instance(spells::terraforming(), p1, Zone::Hand);

    // Condition is false with no field spell in the deck; the body (and its
    // selection prompt) never runs.
    assert!(!dispatch::can_activate(&state, terraforming, EffectHook::Spell));
    let activation =
        dispatch::activate(&mut state, &mut engine, terraforming, EffectHook::Spell).unwrap();
    assert!(activation.condition_failed());
    assert!(!engine.is_suspended());
    assert_eq!(engine.degraded_steps(), 0);
}

#[test]
fn terraforming_searches_a_field_spell() {
    let (mut state, mut engine, p1) = new_duel();
    state.create_instance(filler("Normal Spell"), p1, Zone::Deck);
    let chicken_game = state.create_instance(spells::chicken_game(), p1, Zone::Deck);
    let terraforming = state.create_instance(spells::terraforming(), p1, Zone::Hand);

    let activation =
        dispatch::activate(&mut state, &mut engine, terraforming, EffectHook::Spell).unwrap();
    assert!(activation.started());
    assert!(engine.is_suspended());

    // The prompt offers only field spells.
    match engine.pending_request().unwrap() {
        PendingRequest::Selection(request) => {
            assert_eq!(request.candidates, vec![chicken_game]);
        }
        PendingRequest::Option(_) => panic!("expected a selection request"),
    }

    resolve_with_policy(&mut state, &mut engine, &mut FirstChoicePolicy).unwrap();
    assert!(activation.is_resolved());
    assert_eq!(state.zones(p1).hand.cards, vec![chicken_game]);
    assert!(state.zones(p1).graveyard.contains(terraforming));
}

#[test]
fn identity_survives_zone_round_trip() {
    let (mut state, _engine, p1) = new_duel();
    state.create_instance(filler("Below"), p1, Zone::Deck);
    let card = state.create_instance(filler("Traveler"), p1, Zone::Deck);

    send_card(&mut state, card, Zone::Graveyard).unwrap();
    send_card_with(
        &mut state,
        card,
        Zone::Deck,
        SendOptions {
            deck_side: DeckSide::Top,
            ..SendOptions::default()
        },
    )
    .unwrap();

    let drawn = ygo_duel_rs::game::draw_top(&mut state, p1).unwrap();
    assert_eq!(drawn, Some(card));
    assert_eq!(state.instance(card).unwrap().zone, Zone::Hand);
    state.verify_zone_integrity().unwrap();
}

#[test]
fn critter_searches_when_it_hits_the_graveyard() {
    let (mut state, mut engine, p1) = new_duel();
    let stone = state.create_instance(monsters::giant_soldier_of_stone(), p1, Zone::Deck);
    state.create_instance(monsters::summoned_skull(), p1, Zone::Deck);
    let critter = state.create_instance(monsters::critter(), p1, Zone::Hand);

    // The discard itself cascades nothing; the dispatcher fires the
    // movement hooks afterwards.
    let from = send_card(&mut state, critter, Zone::Graveyard).unwrap();
    assert!(engine.is_idle());

    let activations =
        dispatch::fire_movement_triggers(&mut state, &mut engine, critter, from, Zone::Graveyard)
            .unwrap();
    assert_eq!(activations.len(), 1);
    assert!(engine.is_suspended());

    resolve_with_policy(&mut state, &mut engine, &mut FirstChoicePolicy).unwrap();
    // Giant Soldier of Stone (1300 ATK) is the only legal target; Summoned
    // Skull (2500) is over the line.
    assert_eq!(state.zones(p1).hand.cards, vec![stone]);
    assert!(activations[0].is_resolved());
}

#[test]
fn chicken_game_is_once_per_turn_and_costs_life() {
    let (mut state, mut engine, p1) = new_duel();
    state.create_instance(filler("Deck 1"), p1, Zone::Deck);
    state.create_instance(filler("Deck 2"), p1, Zone::Deck);
    let chicken_game = state.create_instance(spells::chicken_game(), p1, Zone::Hand);
    send_card(&mut state, chicken_game, Zone::FieldZone).unwrap();

    let activation =
        dispatch::activate(&mut state, &mut engine, chicken_game, EffectHook::Ignition).unwrap();
    assert!(activation.is_resolved());
    assert_eq!(state.get_player(p1).unwrap().life, 7000);
    assert_eq!(state.zones(p1).hand.len(), 1);

    // Second activation the same turn is gated off.
    assert!(!dispatch::can_activate(&state, chicken_game, EffectHook::Ignition));

    // A new turn clears the memo.
    state.begin_turn();
    state.begin_turn();
    assert!(dispatch::can_activate(&state, chicken_game, EffectHook::Ignition));
}

#[test]
fn premature_burial_revives_through_selection() {
    let (mut state, mut engine, p1) = new_duel();
    let skull = state.create_instance(monsters::summoned_skull(), p1, Zone::Graveyard);
    let burial = state.create_instance(spells::premature_burial(), p1, Zone::Hand);

    let activation =
        dispatch::activate(&mut state, &mut engine, burial, EffectHook::Spell).unwrap();
    assert!(activation.started());
    assert_eq!(state.get_player(p1).unwrap().life, 7200);

    resolve_with_policy(&mut state, &mut engine, &mut FirstChoicePolicy).unwrap();
    assert!(activation.is_resolved());
    assert!(state.zones(p1).monster_field.contains(skull));
    assert!(state.zones(p1).spell_trap_field.contains(burial));
    state.verify_zone_integrity().unwrap();
}

#[test]
fn illegal_selection_keeps_the_request_alive() {
    let (mut state, mut engine, p1) = new_duel();
    let chicken_game = state.create_instance(spells::chicken_game(), p1, Zone::Deck);
    let decoy = state.create_instance(filler("Decoy"), p1, Zone::Hand);
    let terraforming = state.create_instance(spells::terraforming(), p1, Zone::Hand);

    dispatch::activate(&mut state, &mut engine, terraforming, EffectHook::Spell).unwrap();
    assert!(engine.is_suspended());

    // The decoy is in hand, not among the candidates.
    let err = engine.submit_selection(&mut state, &[decoy]).unwrap_err();
    assert!(matches!(err, DuelError::IllegalSelection(_)));
    assert!(engine.is_suspended());

    engine.submit_selection(&mut state, &[chicken_game]).unwrap();
    assert!(engine.is_idle());
    assert!(state.zones(p1).hand.contains(chicken_game));
}

#[test]
fn seeded_duels_resolve_identically() {
    let run = |seed: u64| -> (Vec<InstanceId>, Vec<InstanceId>, Vec<InstanceId>) {
        let (mut state, mut engine, p1) = new_duel();
        state.seed_rng(seed);
        for i in 0..10 {
            state.create_instance(filler(&format!("Deck {i}")), p1, Zone::Deck);
        }
        state.create_instance(monsters::giant_soldier_of_stone(), p1, Zone::Deck);
        state.shuffle_deck(p1);

        let critter = state.create_instance(monsters::critter(), p1, Zone::Hand);
        let from = send_card(&mut state, critter, Zone::Graveyard).unwrap();
        dispatch::fire_movement_triggers(&mut state, &mut engine, critter, from, Zone::Graveyard)
            .unwrap();
        let mut policy = RandomChoicePolicy::with_seed(seed);
        resolve_with_policy(&mut state, &mut engine, &mut policy).unwrap();

        (
            state.zones(p1).deck.cards.clone(),
            state.zones(p1).hand.cards.clone(),
            state.zones(p1).graveyard.cards.clone(),
        )
    };

    similar_asserts::assert_eq!(run(42), run(42));
}
