//! Monster card scripts

use crate::core::{
    Attribute, CardCategory, CardDefinition, CardEffects, EffectHandler, EffectHook, InstanceId,
    MonsterKind, MonsterStats, Race, Resolve,
};
use crate::game::{movement, CardSelector, DuelState, ResolutionEngine, SelectOpts, VerbosityLevel};
use crate::zones::Zone;
use std::sync::Arc;

fn stats(
    kind: MonsterKind,
    attribute: Attribute,
    race: Race,
    level: u8,
    attack: i32,
    defense: i32,
) -> MonsterStats {
    MonsterStats {
        kind,
        attribute,
        race,
        level: Some(level),
        rank: None,
        link: None,
        attack,
        defense: Some(defense),
    }
}

// --- Critter ---

fn critter_condition(state: &DuelState, card: InstanceId) -> bool {
    let Ok(instance) = state.instance(card) else {
        return false;
    };
    CardSelector::new(state, instance.owner)
        .deck()
        .filter()
        .monsters()
        .attack_at_most(1500)
        .len()
        > 0
}

fn critter_body(
    _state: &mut DuelState,
    engine: &mut ResolutionEngine,
    card: InstanceId,
    resolve: Resolve,
) {
    engine.with_user_select_card(
        card,
        move |state| match state.instance(card) {
            Ok(instance) => CardSelector::new(state, instance.owner)
                .deck()
                .filter()
                .monsters()
                .attack_at_most(1500)
                .ids(),
            Err(_) => Vec::new(),
        },
        SelectOpts::single("Add a monster with 1500 or less ATK to your hand"),
        move |state, _, _, chosen| {
            if let Err(e) = movement::send_card(state, chosen[0], Zone::Hand) {
                state.logger.log_with_category(
                    VerbosityLevel::Verbose,
                    format!("search target vanished: {e}"),
                    Some("cards"),
                );
            }
            resolve.invoke(state);
        },
    );
}

pub fn critter() -> Arc<CardDefinition> {
    Arc::new(
        CardDefinition::new(
            "Critter",
            CardCategory::Monster(stats(
                MonsterKind::Effect,
                Attribute::Dark,
                Race::Fiend,
                3,
                1000,
                600,
            )),
            "When this card is sent to the GY: add 1 monster with 1500 or less ATK \
             from your Deck to your hand.",
        )
        .with_effects(CardEffects::new().on(
            EffectHook::AnywhereToGraveyard,
            EffectHandler::new(critter_condition, critter_body),
        )),
    )
}

// --- vanilla monsters ---

pub fn summoned_skull() -> Arc<CardDefinition> {
    Arc::new(CardDefinition::new(
        "Summoned Skull",
        CardCategory::Monster(stats(
            MonsterKind::Normal,
            Attribute::Dark,
            Race::Fiend,
            6,
            2500,
            1200,
        )),
        "A fiend with dark powers for confusing the enemy.",
    ))
}

pub fn giant_soldier_of_stone() -> Arc<CardDefinition> {
    Arc::new(CardDefinition::new(
        "Giant Soldier of Stone",
        CardCategory::Monster(stats(
            MonsterKind::Normal,
            Attribute::Earth,
            Race::Rock,
            3,
            1300,
            2000,
        )),
        "A giant warrior made of stone. A punch from this monster has tremendous power.",
    ))
}
