//! Turn Selector: who must act next, or whether the phase is done.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;
use crate::ledger::Ledger;

use super::payload::{ChoiceState, CommunicationState, PhasePayload};

/// Selector result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NextActor {
    Player(PlayerId),
    PhaseComplete,
}

/// Compute the next obligated actor for the current payload.
///
/// - Communication: the first eligible, non-withdrawn player after the last
///   actor in ascending seat order, wrapping around (seat 0 first at phase
///   start). Complete when the exchange cap is hit, the phase was closed, or
///   no eligible player remains who has not withdrawn.
/// - Simultaneous choice: the lowest-indexed eligible player without a
///   choice. Complete when every eligible player has chosen.
#[must_use]
pub fn next_actor(payload: &PhasePayload, ledger: &Ledger) -> NextActor {
    let next = match payload {
        PhasePayload::Communication(state) => next_speaker(state, ledger),
        PhasePayload::SimultaneousChoice(state) => next_chooser(state, ledger),
        PhasePayload::GameOver => None,
    };
    next.map_or(NextActor::PhaseComplete, NextActor::Player)
}

fn next_speaker(state: &CommunicationState, ledger: &Ledger) -> Option<PlayerId> {
    if state.closed || state.cap_reached() {
        return None;
    }

    let player_count = state.withdrawn.player_count();
    let can_speak = |p: &PlayerId| ledger.is_eligible(*p) && !state.is_withdrawn(*p);

    match state.last_actor {
        None => PlayerId::all(player_count).find(can_speak),
        Some(last) => last.round_robin(player_count).find(can_speak),
    }
}

fn next_chooser(state: &ChoiceState, ledger: &Ledger) -> Option<PlayerId> {
    state
        .choices
        .player_ids()
        .find(|p| ledger.is_eligible(*p) && !state.has_chosen(*p))
}
