//! Spell card scripts

use crate::core::{
    CardCategory, CardDefinition, CardEffects, EffectHandler, EffectHook, InstanceId, Position,
    Resolve, SpellKind, SummonKind,
};
use crate::game::{
    dispatch, movement, CardSelector, DelayOpts, DrawOpts, DuelState, ResolutionEngine,
    SelectOpts, VerbosityLevel,
};
use crate::zones::Zone;
use std::sync::Arc;

fn owner_of(state: &DuelState, card: InstanceId) -> Option<crate::core::PlayerId> {
    state.instance(card).ok().map(|i| i.owner)
}

// --- Pot of Greed ---

fn pot_of_greed_condition(state: &DuelState, card: InstanceId) -> bool {
    match owner_of(state, card) {
        Some(owner) => CardSelector::new(state, owner).deck().len() >= 2,
        None => false,
    }
}

fn pot_of_greed_body(
    state: &mut DuelState,
    engine: &mut ResolutionEngine,
    card: InstanceId,
    resolve: Resolve,
) {
    engine.with_draw(state, card, DrawOpts { count: 2 }, move |_, engine, card| {
        engine.with_send_to_graveyard(card, vec![card], move |state, _, _| {
            resolve.invoke(state);
        });
    });
}

pub fn pot_of_greed() -> Arc<CardDefinition> {
    Arc::new(
        CardDefinition::new(
            "Pot of Greed",
            CardCategory::Spell(SpellKind::Normal),
            "Draw 2 cards.",
        )
        .with_effects(CardEffects::new().on(
            EffectHook::Spell,
            EffectHandler::new(pot_of_greed_condition, pot_of_greed_body),
        )),
    )
}

// --- Card Destruction ---

fn card_destruction_condition(state: &DuelState, card: InstanceId) -> bool {
    match owner_of(state, card) {
        Some(owner) => {
            CardSelector::new(state, owner)
                .hand()
                .filter()
                .exclude_id(card)
                .len()
                > 0
        }
        None => false,
    }
}

fn card_destruction_body(
    _state: &mut DuelState,
    engine: &mut ResolutionEngine,
    card: InstanceId,
    resolve: Resolve,
) {
    engine.with_delay(card, DelayOpts::ticks(1), move |state, engine, card| {
        let Some(owner) = owner_of(state, card) else { return };
        let hand = CardSelector::new(state, owner)
            .hand()
            .filter()
            .exclude_id(card)
            .ids();
        let count = hand.len();

        // Discard everything first; the draw is gated on the graveyard
        // send's continuation, never interleaved with it.
        engine.with_send_to_graveyard(card, hand, move |state, engine, card| {
            engine.with_draw(state, card, DrawOpts { count }, move |_, engine, card| {
                engine.with_send_to_graveyard(card, vec![card], move |state, _, _| {
                    resolve.invoke(state);
                });
            });
        });
    });
}

pub fn card_destruction() -> Arc<CardDefinition> {
    Arc::new(
        CardDefinition::new(
            "Card Destruction",
            CardCategory::Spell(SpellKind::Normal),
            "Discard your entire hand, then draw the same number of cards.",
        )
        .with_effects(CardEffects::new().on(
            EffectHook::Spell,
            EffectHandler::new(card_destruction_condition, card_destruction_body),
        )),
    )
}

// --- Terraforming ---

fn terraforming_condition(state: &DuelState, card: InstanceId) -> bool {
    match owner_of(state, card) {
        Some(owner) => {
            CardSelector::new(state, owner)
                .deck()
                .filter()
                .field_spells()
                .len()
                > 0
        }
        None => false,
    }
}

fn terraforming_body(
    _state: &mut DuelState,
    engine: &mut ResolutionEngine,
    card: InstanceId,
    resolve: Resolve,
) {
    engine.with_user_select_card(
        card,
        move |state| match owner_of(state, card) {
            Some(owner) => CardSelector::new(state, owner)
                .deck()
                .filter()
                .field_spells()
                .ids(),
            None => Vec::new(),
        },
        SelectOpts::single("Add a Field Spell from your deck to your hand"),
        move |state, engine, card, chosen| {
            if let Err(e) = movement::send_card(state, chosen[0], Zone::Hand) {
                state.logger.log_with_category(
                    VerbosityLevel::Verbose,
                    format!("search target vanished: {e}"),
                    Some("cards"),
                );
            }
            engine.with_send_to_graveyard(card, vec![card], move |state, _, _| {
                resolve.invoke(state);
            });
        },
    );
}

pub fn terraforming() -> Arc<CardDefinition> {
    Arc::new(
        CardDefinition::new(
            "Terraforming",
            CardCategory::Spell(SpellKind::Normal),
            "Add 1 Field Spell from your Deck to your hand.",
        )
        .with_effects(CardEffects::new().on(
            EffectHook::Spell,
            EffectHandler::new(terraforming_condition, terraforming_body),
        )),
    )
}

// --- Chicken Game ---

fn chicken_game_condition(state: &DuelState, card: InstanceId) -> bool {
    dispatch::turn_once_condition(state, card, None, |state, card| {
        let Ok(instance) = state.instance(card) else {
            return false;
        };
        if instance.zone != Zone::FieldZone {
            return false;
        }
        let Ok(player) = state.get_player(instance.owner) else {
            return false;
        };
        player.can_pay_life(1000) && !state.zones(instance.owner).deck.is_empty()
    })
}

fn chicken_game_cost(state: &mut DuelState, card: InstanceId) -> bool {
    let Some(owner) = owner_of(state, card) else {
        return false;
    };
    let Ok(player) = state.get_player_mut(owner) else {
        return false;
    };
    if !player.can_pay_life(1000) {
        return false;
    }
    player.lose_life(1000);
    true
}

fn chicken_game_body(
    state: &mut DuelState,
    engine: &mut ResolutionEngine,
    card: InstanceId,
    resolve: Resolve,
) {
    dispatch::mark_turn_once(state, card, None);
    engine.with_draw(state, card, DrawOpts { count: 1 }, move |state, _, _| {
        resolve.invoke(state);
    });
}

pub fn chicken_game() -> Arc<CardDefinition> {
    Arc::new(
        CardDefinition::new(
            "Chicken Game",
            CardCategory::Spell(SpellKind::Field),
            "Once per turn: you can pay 1000 LP; draw 1 card.",
        )
        .with_effects(CardEffects::new().on(
            EffectHook::Ignition,
            EffectHandler::new(chicken_game_condition, chicken_game_body)
                .with_cost(chicken_game_cost),
        )),
    )
}

// --- Premature Burial ---

fn premature_burial_condition(state: &DuelState, card: InstanceId) -> bool {
    let Some(owner) = owner_of(state, card) else {
        return false;
    };
    let Ok(player) = state.get_player(owner) else {
        return false;
    };
    player.can_pay_life(800)
        && CardSelector::new(state, owner)
            .graveyard()
            .filter()
            .monsters()
            .len()
            > 0
}

fn premature_burial_cost(state: &mut DuelState, card: InstanceId) -> bool {
    let Some(owner) = owner_of(state, card) else {
        return false;
    };
    let Ok(player) = state.get_player_mut(owner) else {
        return false;
    };
    if !player.can_pay_life(800) {
        return false;
    }
    player.lose_life(800);
    true
}

fn premature_burial_body(
    _state: &mut DuelState,
    engine: &mut ResolutionEngine,
    card: InstanceId,
    resolve: Resolve,
) {
    engine.with_user_select_card(
        card,
        move |state| match owner_of(state, card) {
            Some(owner) => CardSelector::new(state, owner)
                .graveyard()
                .filter()
                .monsters()
                .ids(),
            None => Vec::new(),
        },
        SelectOpts::single("Special Summon a monster from your graveyard"),
        move |state, _, card, chosen| {
            match movement::summon(state, chosen[0], Position::Attack, SummonKind::Special) {
                Ok(()) => {
                    // The equip card stays on the field with the summon.
                    let _ = movement::send_card(state, card, Zone::SpellTrapField);
                }
                Err(e) => {
                    state.logger.log_with_category(
                        VerbosityLevel::Verbose,
                        format!("summon target vanished: {e}"),
                        Some("cards"),
                    );
                }
            }
            resolve.invoke(state);
        },
    );
}

pub fn premature_burial() -> Arc<CardDefinition> {
    Arc::new(
        CardDefinition::new(
            "Premature Burial",
            CardCategory::Spell(SpellKind::Equip),
            "Pay 800 LP, then Special Summon 1 monster from your GY in Attack Position.",
        )
        .with_effects(CardEffects::new().on(
            EffectHook::Spell,
            EffectHandler::new(premature_burial_condition, premature_burial_body)
                .with_cost(premature_burial_cost),
        )),
    )
}
