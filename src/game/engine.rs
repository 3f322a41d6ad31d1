//! Effect resolution engine
//!
//! A cooperative, single-threaded scheduler for card effects. Effect bodies
//! call the `with_*` primitives to schedule continuations instead of
//! mutating state across hidden callback chains: every pending unit of work
//! is an explicit `PendingStep` in one queue, drained in (due tick, FIFO)
//! order by `run`.
//!
//! "Delay" is a logical pacing unit, not wall-clock time. `run` fast-forwards
//! the clock to the next due step; steps scheduled for the same tick execute
//! in the order they were scheduled. The only suspension points are pacing
//! delays and genuine waits for an external choice (`SelectionRequest` /
//! `OptionRequest`). While a request is pending the queue holds still;
//! `submit_selection` / `submit_option` validate the answer, invoke the
//! continuation and resume draining.
//!
//! Invariants the engine guarantees:
//! - scheduled steps are never dropped (outside `abort`) or duplicated;
//! - a step observes all mutations made by every step that ran before it;
//! - an empty candidate list degrades the selection to a logged no-op
//!   instead of suspending or failing.

use crate::core::{InstanceId, PlayerId};
use crate::game::{movement, DuelState, VerbosityLevel};
use crate::zones::Zone;
use crate::{DuelError, Result};
use std::fmt;

type StepFn = Box<dyn FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId)>;
type CandidatesFn = Box<dyn FnOnce(&DuelState) -> Vec<InstanceId>>;
type SelectedFn = Box<dyn FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId, Vec<InstanceId>)>;
type ChosenFn = Box<dyn FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId, String)>;

/// Pacing configuration for a scheduled step
#[derive(Debug, Clone, Copy, Default)]
pub struct DelayOpts {
    /// Pacing units between now and the step running
    pub delay: u64,
}

impl DelayOpts {
    pub fn ticks(delay: u64) -> Self {
        DelayOpts { delay }
    }
}

/// Selection arity for a user card choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Exactly one card
    Single,
    /// Any count within the bounds (inclusive; `max` None = unbounded)
    Multiple { min: usize, max: Option<usize> },
}

/// Configuration for `with_user_select_card`
#[derive(Debug, Clone)]
pub struct SelectOpts {
    pub mode: SelectionMode,
    pub message: String,
}

impl SelectOpts {
    pub fn single(message: impl Into<String>) -> Self {
        SelectOpts {
            mode: SelectionMode::Single,
            message: message.into(),
        }
    }

    pub fn multiple(min: usize, max: Option<usize>, message: impl Into<String>) -> Self {
        SelectOpts {
            mode: SelectionMode::Multiple { min, max },
            message: message.into(),
        }
    }
}

/// A named choice guarded by a legality condition
pub struct EffectOption {
    pub label: String,
    pub condition: fn(&DuelState, InstanceId) -> bool,
}

impl EffectOption {
    pub fn new(label: impl Into<String>, condition: fn(&DuelState, InstanceId) -> bool) -> Self {
        EffectOption {
            label: label.into(),
            condition,
        }
    }

    /// An option that is always offered
    pub fn always(label: impl Into<String>) -> Self {
        EffectOption::new(label, |_, _| true)
    }
}

/// Draw configuration
#[derive(Debug, Clone, Copy)]
pub struct DrawOpts {
    pub count: usize,
}

/// Life point adjustment
#[derive(Debug, Clone, Copy)]
pub struct LifeChange {
    pub player: PlayerId,
    pub amount: i32,
    pub gain: bool,
}

/// A suspended card choice surfaced to the external actor
#[derive(Debug, Clone)]
pub struct SelectionRequest {
    /// The card whose effect is asking
    pub card: InstanceId,
    /// Candidates in store order; the answer must be drawn from these
    pub candidates: Vec<InstanceId>,
    pub mode: SelectionMode,
    pub message: String,
}

/// A suspended named-option choice
#[derive(Debug, Clone)]
pub struct OptionRequest {
    pub card: InstanceId,
    /// Labels of the options whose conditions held, in declaration order
    pub options: Vec<String>,
}

/// Read-only view of whatever the engine is currently waiting on
#[derive(Debug)]
pub enum PendingRequest<'a> {
    Selection(&'a SelectionRequest),
    Option(&'a OptionRequest),
}

/// One scheduled unit of work
struct PendingStep {
    /// Clock tick at which the step becomes runnable
    due: u64,
    /// FIFO tiebreak for steps due on the same tick
    seq: u64,
    /// Acting card, passed back to the continuation
    card: InstanceId,
    run: StepFn,
}

enum PendingInput {
    Selection {
        request: SelectionRequest,
        on_selected: SelectedFn,
    },
    Choice {
        request: OptionRequest,
        on_chosen: ChosenFn,
    },
}

/// The scheduler. One engine drives one duel's effect resolution.
#[derive(Default)]
pub struct ResolutionEngine {
    queue: Vec<PendingStep>,
    pending: Option<PendingInput>,
    clock: u64,
    next_seq: u64,
    degraded_steps: u32,
}

impl ResolutionEngine {
    pub fn new() -> Self {
        ResolutionEngine::default()
    }

    // --- introspection ---

    /// Steps currently scheduled (suspended request not included)
    pub fn queued_steps(&self) -> usize {
        self.queue.len()
    }

    /// Current logical clock tick
    pub fn current_tick(&self) -> u64 {
        self.clock
    }

    /// Waiting on an external choice?
    pub fn is_suspended(&self) -> bool {
        self.pending.is_some()
    }

    /// Nothing scheduled and nothing pending
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.pending.is_none()
    }

    /// Selection steps that degraded to no-ops on empty candidates
    pub fn degraded_steps(&self) -> u32 {
        self.degraded_steps
    }

    /// The request the engine is suspended on, if any
    pub fn pending_request(&self) -> Option<PendingRequest<'_>> {
        match &self.pending {
            Some(PendingInput::Selection { request, .. }) => Some(PendingRequest::Selection(request)),
            Some(PendingInput::Choice { request, .. }) => Some(PendingRequest::Option(request)),
            None => None,
        }
    }

    // --- primitives ---

    /// Schedule `step` to run after `opts.delay` pacing units
    ///
    /// Returns immediately; the step runs when `run` drains past its due
    /// tick, with exclusive access to the state as of that moment.
    pub fn with_delay(
        &mut self,
        card: InstanceId,
        opts: DelayOpts,
        step: impl FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId) + 'static,
    ) {
        let due = self.clock + opts.delay;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(PendingStep {
            due,
            seq,
            card,
            run: Box::new(step),
        });
    }

    /// Run `step` `times` times, `opts.delay` apart, with a strictly
    /// increasing loop index in `0..times`; then `on_complete`
    ///
    /// Iterations are strictly sequential: each observes the mutations of
    /// all prior iterations (and of any other step that ran in between).
    /// `times == 0` completes synchronously.
    pub fn with_delay_recursive<F, G>(
        &mut self,
        state: &mut DuelState,
        card: InstanceId,
        opts: DelayOpts,
        times: u32,
        step: F,
        on_complete: G,
    ) where
        F: FnMut(&mut DuelState, &mut ResolutionEngine, InstanceId, u32) + 'static,
        G: FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId) + 'static,
    {
        if times == 0 {
            on_complete(state, self, card);
            return;
        }
        self.schedule_iteration(card, opts, 0, times, step, on_complete);
    }

    fn schedule_iteration<F, G>(
        &mut self,
        card: InstanceId,
        opts: DelayOpts,
        depth: u32,
        times: u32,
        mut step: F,
        on_complete: G,
    ) where
        F: FnMut(&mut DuelState, &mut ResolutionEngine, InstanceId, u32) + 'static,
        G: FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId) + 'static,
    {
        self.with_delay(card, opts, move |state, engine, card| {
            step(state, engine, card, depth);
            let next = depth + 1;
            if next < times {
                engine.schedule_iteration(card, opts, next, times, step, on_complete);
            } else {
                on_complete(state, engine, card);
            }
        });
    }

    /// Schedule a user card selection
    ///
    /// `candidates` is evaluated when the step actually runs, so it sees
    /// every mutation made by earlier steps. Zero candidates degrade the
    /// step to a logged no-op: the prompt never surfaces and `on_selected`
    /// is not invoked. Otherwise the engine suspends until
    /// `submit_selection` supplies a valid answer; `on_selected` then runs
    /// exactly once with the chosen ids reordered to candidate order.
    pub fn with_user_select_card(
        &mut self,
        card: InstanceId,
        candidates: impl FnOnce(&DuelState) -> Vec<InstanceId> + 'static,
        opts: SelectOpts,
        on_selected: impl FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId, Vec<InstanceId>)
            + 'static,
    ) {
        let candidates: CandidatesFn = Box::new(candidates);
        let on_selected: SelectedFn = Box::new(on_selected);
        self.with_delay(card, DelayOpts::default(), move |state, engine, card| {
            let found = candidates(state);
            if found.is_empty() {
                engine.degraded_steps += 1;
                state.logger.log_with_category(
                    VerbosityLevel::Verbose,
                    format!("selection for card {card} degraded: no candidates"),
                    Some("selection"),
                );
                return;
            }
            engine.pending = Some(PendingInput::Selection {
                request: SelectionRequest {
                    card,
                    candidates: found,
                    mode: opts.mode,
                    message: opts.message,
                },
                on_selected,
            });
        });
    }

    /// Schedule a named-option choice
    ///
    /// Options whose condition fails are not offered. No options available
    /// degrades to a no-op; otherwise the engine suspends until
    /// `submit_option` picks one, and `on_chosen` receives the label.
    pub fn with_option(
        &mut self,
        card: InstanceId,
        options: Vec<EffectOption>,
        on_chosen: impl FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId, String) + 'static,
    ) {
        let on_chosen: ChosenFn = Box::new(on_chosen);
        self.with_delay(card, DelayOpts::default(), move |state, engine, card| {
            let available: Vec<String> = options
                .iter()
                .filter(|opt| (opt.condition)(state, card))
                .map(|opt| opt.label.clone())
                .collect();
            if available.is_empty() {
                engine.degraded_steps += 1;
                state.logger.log_with_category(
                    VerbosityLevel::Verbose,
                    format!("option choice for card {card} degraded: no legal options"),
                    Some("selection"),
                );
                return;
            }
            engine.pending = Some(PendingInput::Choice {
                request: OptionRequest {
                    card,
                    options: available,
                },
                on_chosen,
            });
        });
    }

    /// Draw up to `opts.count` cards from the acting card owner's deck,
    /// one per pacing step, then `on_done`
    ///
    /// Exhausting the deck stops the draws silently; whether that loses the
    /// duel is the turn loop's rule, not the engine's.
    pub fn with_draw(
        &mut self,
        state: &mut DuelState,
        card: InstanceId,
        opts: DrawOpts,
        on_done: impl FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId) + 'static,
    ) {
        self.with_delay_recursive(
            state,
            card,
            DelayOpts::ticks(1),
            opts.count as u32,
            |state, _engine, card, _depth| {
                let owner = match state.instance(card) {
                    Ok(instance) => instance.owner,
                    Err(_) => return,
                };
                match movement::draw_top(state, owner) {
                    Ok(Some(drawn)) => {
                        state.logger.log_with_category(
                            VerbosityLevel::Verbose,
                            format!("card {drawn} drawn"),
                            Some("engine"),
                        );
                    }
                    Ok(None) => {
                        state.logger.log_with_category(
                            VerbosityLevel::Verbose,
                            "draw skipped: deck is empty".to_string(),
                            Some("engine"),
                        );
                    }
                    Err(_) => {}
                }
            },
            on_done,
        );
    }

    /// Send `targets` to their owners' graveyards preserving relative
    /// order, then `on_done`
    ///
    /// Targets that went stale since they were captured are skipped
    /// silently. No cascading hooks fire here; that is the trigger
    /// dispatcher's job, after this primitive completes.
    pub fn with_send_to_graveyard(
        &mut self,
        card: InstanceId,
        targets: Vec<InstanceId>,
        on_done: impl FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId) + 'static,
    ) {
        self.with_delay(card, DelayOpts::default(), move |state, engine, card| {
            for target in targets {
                match movement::send_card(state, target, Zone::Graveyard) {
                    Ok(_) => {}
                    Err(DuelError::StaleReference(_)) | Err(DuelError::EntityNotFound(_)) => {
                        state.logger.log_with_category(
                            VerbosityLevel::Verbose,
                            format!("graveyard send skipped stale card {target}"),
                            Some("engine"),
                        );
                    }
                    Err(e) => {
                        state
                            .logger
                            .minimal(format!("graveyard send failed for {target}: {e}"));
                    }
                }
            }
            on_done(state, engine, card);
        });
    }

    /// Schedule a life point change, then `on_done`
    pub fn with_life_change(
        &mut self,
        card: InstanceId,
        change: LifeChange,
        on_done: impl FnOnce(&mut DuelState, &mut ResolutionEngine, InstanceId) + 'static,
    ) {
        self.with_delay(card, DelayOpts::default(), move |state, engine, card| {
            if let Ok(player) = state.get_player_mut(change.player) {
                if change.gain {
                    player.gain_life(change.amount);
                } else {
                    player.lose_life(change.amount);
                }
                let life = player.life;
                state.logger.log_with_category(
                    VerbosityLevel::Normal,
                    format!("player {} life is now {life}", change.player),
                    Some("engine"),
                );
            }
            on_done(state, engine, card);
        });
    }

    // --- scheduling loop ---

    /// Drain the queue until the engine suspends or goes quiescent
    ///
    /// Steps run strictly in (due tick, scheduling order); the clock
    /// fast-forwards between ticks. Re-entrant calls from inside a step are
    /// unnecessary (the loop is already draining) and unsupported.
    pub fn run(&mut self, state: &mut DuelState) {
        while self.pending.is_none() {
            let Some(step) = self.pop_ready() else { break };
            (step.run)(state, self, step.card);
        }
    }

    fn pop_ready(&mut self) -> Option<PendingStep> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .min_by_key(|(_, step)| (step.due, step.seq))
            .map(|(idx, _)| idx)?;
        let step = self.queue.remove(idx);
        self.clock = self.clock.max(step.due);
        Some(step)
    }

    /// Answer the pending selection request
    ///
    /// Validates arity and candidate membership; an illegal answer returns
    /// `DuelError::IllegalSelection` and leaves the request pending so the
    /// actor may retry. A valid answer consumes the request, invokes the
    /// continuation with the chosen ids in candidate order, and resumes
    /// draining.
    pub fn submit_selection(&mut self, state: &mut DuelState, chosen: &[InstanceId]) -> Result<()> {
        {
            let Some(PendingInput::Selection { request, .. }) = &self.pending else {
                return Err(DuelError::InvalidAction(
                    "no selection request is pending".to_string(),
                ));
            };
            validate_selection(request, chosen)?;
        }

        let Some(PendingInput::Selection { request, on_selected }) = self.pending.take() else {
            unreachable!("pending selection checked above");
        };

        // Normalize to candidate order so effects see a subsequence of the
        // list they offered.
        let ordered: Vec<InstanceId> = request
            .candidates
            .iter()
            .copied()
            .filter(|id| chosen.contains(id))
            .collect();

        on_selected(state, self, request.card, ordered);
        self.run(state);
        Ok(())
    }

    /// Answer the pending option request by index into its option list
    pub fn submit_option(&mut self, state: &mut DuelState, index: usize) -> Result<()> {
        {
            let Some(PendingInput::Choice { request, .. }) = &self.pending else {
                return Err(DuelError::InvalidAction(
                    "no option request is pending".to_string(),
                ));
            };
            if index >= request.options.len() {
                return Err(DuelError::IllegalSelection(format!(
                    "option index {index} out of range ({} options)",
                    request.options.len()
                )));
            }
        }

        let Some(PendingInput::Choice { request, on_chosen }) = self.pending.take() else {
            unreachable!("pending choice checked above");
        };

        let label = request.options[index].clone();
        on_chosen(state, self, request.card, label);
        self.run(state);
        Ok(())
    }

    /// Forfeit: discard every scheduled step and any pending request
    ///
    /// The only sanctioned cancellation; individual effects cannot be
    /// cancelled or timed out.
    pub fn abort(&mut self) {
        self.queue.clear();
        self.pending = None;
    }
}

fn validate_selection(request: &SelectionRequest, chosen: &[InstanceId]) -> Result<()> {
    match request.mode {
        SelectionMode::Single => {
            if chosen.len() != 1 {
                return Err(DuelError::IllegalSelection(format!(
                    "expected exactly 1 card, got {}",
                    chosen.len()
                )));
            }
        }
        SelectionMode::Multiple { min, max } => {
            if chosen.len() < min {
                return Err(DuelError::IllegalSelection(format!(
                    "expected at least {min} cards, got {}",
                    chosen.len()
                )));
            }
            if let Some(max) = max {
                if chosen.len() > max {
                    return Err(DuelError::IllegalSelection(format!(
                        "expected at most {max} cards, got {}",
                        chosen.len()
                    )));
                }
            }
        }
    }

    for (i, id) in chosen.iter().enumerate() {
        if !request.candidates.contains(id) {
            return Err(DuelError::IllegalSelection(format!(
                "card {id} is not among the offered candidates"
            )));
        }
        if chosen[..i].contains(id) {
            return Err(DuelError::IllegalSelection(format!(
                "card {id} chosen more than once"
            )));
        }
    }

    Ok(())
}

impl fmt::Debug for ResolutionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionEngine")
            .field("queued_steps", &self.queue.len())
            .field("suspended", &self.pending.is_some())
            .field("clock", &self.clock)
            .field("degraded_steps", &self.degraded_steps)
            .finish()
    }
}
