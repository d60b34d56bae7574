//! Phase state machine: where play goes when a phase completes.
//!
//! The machine owns no data. `advance` is a pure function of the round
//! plan and the current position; the remaining functions apply one step
//! of the machine to a `GameState`.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, PhaseSpec, PlayerMap, RoundPlan, RoundRecord};
use crate::engine::EngineError;
use crate::turns::{Choices, PhasePayload};

/// Next position after the current phase completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Next phase of the same round.
    NextPhase(usize),
    /// Round closes; play continues with this round number.
    NextRound(u32),
    /// Round closes and the game ends.
    GameOver,
}

/// A completed transition, handed to the announcement hook.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    /// A new phase began within the same round.
    NextPhase { round: u32, phase: String },
    /// A round was scored and the next one began.
    NextRound {
        record: RoundRecord,
        round: u32,
        phase: String,
    },
    /// The last round was scored and the game ended.
    GameOver { record: RoundRecord },
}

impl Transition {
    /// The round closed by this transition, if any.
    #[must_use]
    pub fn record(&self) -> Option<&RoundRecord> {
        match self {
            Transition::NextPhase { .. } => None,
            Transition::NextRound { record, .. } | Transition::GameOver { record } => Some(record),
        }
    }
}

/// Compute where play goes after the current phase.
#[must_use]
pub fn advance(plan: &RoundPlan, round: u32, phase_index: usize, finish_requested: bool) -> Advance {
    if finish_requested {
        return Advance::GameOver;
    }

    let phase_count = plan.round(round).map_or(0, |r| r.phases.len());
    if phase_index + 1 < phase_count {
        Advance::NextPhase(phase_index + 1)
    } else if round < plan.final_round() {
        Advance::NextRound(round + 1)
    } else {
        Advance::GameOver
    }
}

/// Enter a phase: set the position and build a fresh payload.
pub fn enter_phase<'p>(
    state: &mut GameState,
    plan: &'p RoundPlan,
    round: u32,
    phase_index: usize,
) -> Result<&'p PhaseSpec, EngineError> {
    let spec = plan
        .phase(round, phase_index)
        .ok_or_else(|| EngineError::invariant(format!("round {round} has no phase {phase_index}")))?;

    state.round = round;
    state.phase_index = phase_index;
    state.payload = PhasePayload::fresh(spec, state.player_count());
    state.phase_sequence = 0;

    tracing::info!(round, phase = %spec.name, kind = %spec.kind.tag(), "phase entered");
    Ok(spec)
}

/// Move the choices of a finished choice phase into the round's bank.
pub fn bank_choices(state: &mut GameState) {
    let collected = state.payload.collected_choices();
    state.round_choices.extend(collected);
}

/// Record a scored round and add its deltas to the running totals.
pub fn record_round(
    state: &mut GameState,
    plan: &RoundPlan,
    choices: Choices,
    deltas: PlayerMap<i64>,
) -> Result<RoundRecord, EngineError> {
    if deltas.player_count() != state.player_count() {
        return Err(EngineError::invariant(format!(
            "scoring hook returned {} deltas for {} players",
            deltas.player_count(),
            state.player_count()
        )));
    }
    let round = state.round;
    let multiplier = plan
        .round(round)
        .map(|r| r.multiplier)
        .ok_or_else(|| EngineError::invariant(format!("round {round} is not in the plan")))?;

    state.apply_deltas(&deltas);
    state.round_choices.clear();

    let record = RoundRecord {
        round,
        multiplier,
        choices,
        deltas,
    };
    state.rounds.push_back(record.clone());

    tracing::info!(round, multiplier, "round scored");
    Ok(record)
}

/// Enter the terminal state.
pub fn enter_game_over(state: &mut GameState) {
    state.payload = PhasePayload::GameOver;
    state.phase_sequence = 0;
    tracing::info!(round = state.round, "game over");
}
