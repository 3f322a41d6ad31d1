//! Choice policies: in-process actors answering engine requests
//!
//! The engine surfaces selection/option requests and nothing else; a
//! `ChoicePolicy` is whatever answers them — a UI, a scripted test, or one
//! of the built-in policies here. `resolve_with_policy` pumps the engine to
//! quiescence, so tests and batch simulation can resolve multi-suspension
//! effects unattended.

use crate::core::InstanceId;
use crate::game::{
    DuelState, OptionRequest, PendingRequest, ResolutionEngine, SelectionMode, SelectionRequest,
};
use crate::Result;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

/// An actor that answers pending engine requests
pub trait ChoicePolicy {
    /// Choose cards for a selection request. The answer must satisfy the
    /// request's arity and be drawn from its candidates.
    fn choose_cards(&mut self, state: &DuelState, request: &SelectionRequest) -> Vec<InstanceId>;

    /// Choose an option by index into the request's option list.
    fn choose_option(&mut self, state: &DuelState, request: &OptionRequest) -> usize;
}

/// Deterministic policy: always the first legal minimal choice
///
/// Useful for reproducible tests and as a baseline actor.
#[derive(Debug, Default)]
pub struct FirstChoicePolicy;

impl ChoicePolicy for FirstChoicePolicy {
    fn choose_cards(&mut self, _state: &DuelState, request: &SelectionRequest) -> Vec<InstanceId> {
        match request.mode {
            SelectionMode::Single => request.candidates.iter().copied().take(1).collect(),
            SelectionMode::Multiple { min, .. } => {
                request.candidates.iter().copied().take(min.max(1)).collect()
            }
        }
    }

    fn choose_option(&mut self, _state: &DuelState, _request: &OptionRequest) -> usize {
        0
    }
}

/// Seeded random policy for exploring resolution paths
#[derive(Debug)]
pub struct RandomChoicePolicy {
    rng: ChaCha12Rng,
}

impl RandomChoicePolicy {
    pub fn with_seed(seed: u64) -> Self {
        RandomChoicePolicy {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl ChoicePolicy for RandomChoicePolicy {
    fn choose_cards(&mut self, _state: &DuelState, request: &SelectionRequest) -> Vec<InstanceId> {
        use rand::seq::SliceRandom;
        match request.mode {
            SelectionMode::Single => {
                let idx = self.rng.gen_range(0..request.candidates.len());
                vec![request.candidates[idx]]
            }
            SelectionMode::Multiple { min, max } => {
                let upper = max.unwrap_or(request.candidates.len()).min(request.candidates.len());
                let lower = min.min(upper);
                let count = self.rng.gen_range(lower..=upper);
                request
                    .candidates
                    .choose_multiple(&mut self.rng, count)
                    .copied()
                    .collect()
            }
        }
    }

    fn choose_option(&mut self, _state: &DuelState, request: &OptionRequest) -> usize {
        self.rng.gen_range(0..request.options.len())
    }
}

/// Pump the engine until it goes quiescent, answering every request
/// through `policy`
pub fn resolve_with_policy(
    state: &mut DuelState,
    engine: &mut ResolutionEngine,
    policy: &mut impl ChoicePolicy,
) -> Result<()> {
    enum Answer {
        Cards(Vec<InstanceId>),
        Choice(usize),
    }

    engine.run(state);
    while engine.is_suspended() {
        let answer = match engine.pending_request() {
            Some(PendingRequest::Selection(request)) => {
                Answer::Cards(policy.choose_cards(state, request))
            }
            Some(PendingRequest::Option(request)) => {
                Answer::Choice(policy.choose_option(state, request))
            }
            None => break,
        };
        match answer {
            Answer::Cards(cards) => engine.submit_selection(state, &cards)?,
            Answer::Choice(index) => engine.submit_option(state, index)?,
        }
    }
    Ok(())
}
