//! Duel CLI - demo scenarios and seeded batch simulation

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use ygo_duel_rs::{
    core::{EffectHook, InstanceId},
    game::{
        dispatch, resolve_with_policy, ChoicePolicy, DuelState, FirstChoicePolicy, OutputMode,
        RandomChoicePolicy, ResolutionEngine, VerbosityLevel,
    },
    loader::{CardLibrary, DeckEntry, DeckList, DeckLoader, DuelConfig, GameInitializer},
    zones::Zone,
};

/// Policy answering selection prompts during unattended play
#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyKind {
    /// Always the first legal minimal choice
    First,
    /// Seeded random choices
    Random,
}

/// Verbosity level (names or numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Two-player trading-card duel engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a demo duel, activating every legal spell with an auto-policy
    Demo {
        /// Deck file (JSON); built-in demo deck if omitted
        #[arg(long, value_name = "DECK_FILE")]
        deck: Option<PathBuf>,

        /// RNG seed for shuffling and the random policy
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Choice policy
        #[arg(long, value_enum, default_value_t = PolicyKind::First)]
        policy: PolicyKind,

        /// Verbosity: silent/minimal/normal/verbose or 0-3
        #[arg(short, long, default_value = "normal")]
        verbosity: VerbosityArg,
    },

    /// Run many seeded demo duels in parallel and aggregate outcomes
    Sim {
        /// Number of duels
        #[arg(long, default_value_t = 100)]
        games: u64,

        /// Base seed; duel i uses seed + i
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

/// Built-in demo deck exercising every engine primitive
fn demo_deck() -> DeckList {
    let entry = |card: &str, count: u8| DeckEntry {
        card: card.to_string(),
        count,
    };
    DeckList {
        name: "Demo".to_string(),
        main: vec![
            entry("Pot of Greed", 3),
            entry("Card Destruction", 2),
            entry("Terraforming", 2),
            entry("Chicken Game", 2),
            entry("Premature Burial", 1),
            entry("Critter", 3),
            entry("Summoned Skull", 4),
            entry("Giant Soldier of Stone", 3),
        ],
        extra: Vec::new(),
    }
}

/// Snapshot of zone membership, for diffing moves after an activation
fn zone_snapshot(state: &DuelState) -> FxHashMap<InstanceId, Zone> {
    let mut snapshot = FxHashMap::default();
    for (id, instance) in state.cards.iter() {
        snapshot.insert(*id, instance.zone);
    }
    snapshot
}

/// Fire movement triggers for every card an activation moved
///
/// The engine's primitives never cascade; the duel driver owns trigger
/// dispatch. Diffing zone membership around the activation tells it which
/// transitions happened.
fn dispatch_moves(
    state: &mut DuelState,
    engine: &mut ResolutionEngine,
    before: &FxHashMap<InstanceId, Zone>,
    policy: &mut impl ChoicePolicy,
) -> anyhow::Result<()> {
    let after = zone_snapshot(state);
    let mut moved: Vec<(InstanceId, Zone, Zone)> = after
        .iter()
        .filter_map(|(id, to)| {
            let from = before.get(id)?;
            (from != to).then_some((*id, *from, *to))
        })
        .collect();
    moved.sort_by_key(|(id, _, _)| *id);

    for (id, from, to) in moved {
        for activation in dispatch::fire_movement_triggers(state, engine, id, from, to)? {
            if activation.started() {
                resolve_with_policy(state, engine, policy)?;
            }
        }
    }
    Ok(())
}

struct DemoOutcome {
    activations: usize,
    player_life: i32,
    hand: usize,
    graveyard: usize,
}

fn run_demo(
    deck: &DeckList,
    seed: u64,
    policy: &mut impl ChoicePolicy,
    verbosity: VerbosityLevel,
) -> anyhow::Result<DemoOutcome> {
    let library = CardLibrary::with_builtin_cards();
    let mut state = GameInitializer::new(&library)
        .init_duel(
            "Player 1",
            deck,
            "Player 2",
            deck,
            DuelConfig {
                seed,
                ..DuelConfig::default()
            },
        )
        .context("initializing duel")?;
    state.logger.set_verbosity(verbosity);
    if verbosity == VerbosityLevel::Silent {
        state.logger.set_output_mode(OutputMode::Memory);
    }

    let mut engine = ResolutionEngine::new();
    let p1 = state.players[0].id;
    let mut activations = 0;

    // Activate until nothing in hand or on the field is legal anymore.
    loop {
        let hand = state.zones(p1).hand.cards.clone();
        let field: Vec<InstanceId> = state.zones(p1).field_zone.cards.clone();

        // Field spells reach the field zone first; their effects are
        // ignition effects activated from there.
        if let Some(&field_spell) = hand.iter().find(|&&id| {
            state
                .instance(id)
                .map(|i| i.definition.is_field_spell())
                .unwrap_or(false)
        }) {
            ygo_duel_rs::game::activate_field_spell(&mut state, field_spell)?;
            continue;
        }

        let next = hand
            .iter()
            .map(|&id| (id, EffectHook::Spell))
            .chain(field.iter().map(|&id| (id, EffectHook::Ignition)))
            .find(|&(id, hook)| dispatch::can_activate(&state, id, hook));

        let Some((card, hook)) = next else { break };

        let before = zone_snapshot(&state);
        let activation = dispatch::activate(&mut state, &mut engine, card, hook)?;
        resolve_with_policy(&mut state, &mut engine, policy)?;
        activation
            .ensure_terminated(&engine)
            .context("activation left unresolved steps")?;
        dispatch_moves(&mut state, &mut engine, &before, policy)?;

        activations += 1;
        state.verify_zone_integrity()?;
    }

    Ok(DemoOutcome {
        activations,
        player_life: state.get_player(p1)?.life,
        hand: state.zones(p1).hand.len(),
        graveyard: state.zones(p1).graveyard.len(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            deck,
            seed,
            policy,
            verbosity,
        } => {
            let deck = match deck {
                Some(path) => DeckLoader::load_from_file(&path)
                    .with_context(|| format!("loading deck {}", path.display()))?,
                None => demo_deck(),
            };
            let outcome = match policy {
                PolicyKind::First => run_demo(&deck, seed, &mut FirstChoicePolicy, verbosity.0)?,
                PolicyKind::Random => run_demo(
                    &deck,
                    seed,
                    &mut RandomChoicePolicy::with_seed(seed),
                    verbosity.0,
                )?,
            };
            println!(
                "demo complete: {} activations, {} LP, {} in hand, {} in graveyard",
                outcome.activations, outcome.player_life, outcome.hand, outcome.graveyard
            );
        }

        Commands::Sim { games, seed } => {
            let deck = demo_deck();
            let outcomes: Vec<DemoOutcome> = (0..games)
                .into_par_iter()
                .map(|i| {
                    let game_seed = seed + i;
                    run_demo(
                        &deck,
                        game_seed,
                        &mut RandomChoicePolicy::with_seed(game_seed),
                        VerbosityLevel::Silent,
                    )
                })
                .collect::<anyhow::Result<Vec<_>>>()?;

            let total_activations: usize = outcomes.iter().map(|o| o.activations).sum();
            let avg_life: f64 =
                outcomes.iter().map(|o| o.player_life as f64).sum::<f64>() / games as f64;
            println!(
                "{games} duels: {total_activations} activations total, {:.1} avg activations, {avg_life:.0} avg LP",
                total_activations as f64 / games as f64
            );
        }
    }

    Ok(())
}
