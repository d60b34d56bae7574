//! Read-only view of a game handed to rules hooks.

use im::Vector;

use crate::core::{GameConfig, GameState, Message, PhaseSpec, PlayerId, PlayerMap, RoundRecord};
use crate::ledger::Ledger;
use crate::turns::PhasePayload;

use super::engine::Outcome;

/// Borrowed view over configuration and state.
///
/// Hooks get a view instead of the state itself so they cannot change
/// turn order, payloads or the transcript behind the engine's back.
#[derive(Clone, Copy, Debug)]
pub struct GameView<'a> {
    config: &'a GameConfig,
    state: &'a GameState,
}

impl<'a> GameView<'a> {
    #[must_use]
    pub fn new(config: &'a GameConfig, state: &'a GameState) -> Self {
        Self { config, state }
    }

    #[must_use]
    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.state.player_count()
    }

    /// Current 1-based round.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.state.round
    }

    #[must_use]
    pub fn final_round(&self) -> u32 {
        self.config.plan.final_round()
    }

    /// Spec of the current phase; `None` once the game is over.
    #[must_use]
    pub fn phase(&self) -> Option<&'a PhaseSpec> {
        if self.state.is_game_over() {
            return None;
        }
        self.config.plan.phase(self.state.round, self.state.phase_index)
    }

    /// Scoring multiplier of the current round.
    #[must_use]
    pub fn multiplier(&self) -> i64 {
        self.config.plan.round(self.state.round).map_or(1, |r| r.multiplier)
    }

    #[must_use]
    pub fn payload(&self) -> &'a PhasePayload {
        &self.state.payload
    }

    /// The player the engine is waiting on.
    #[must_use]
    pub fn actor(&self) -> Option<PlayerId> {
        self.state.actor()
    }

    #[must_use]
    pub fn scores(&self) -> &'a PlayerMap<i64> {
        &self.state.scores
    }

    #[must_use]
    pub fn ledger(&self) -> &'a Ledger {
        &self.state.ledger
    }

    #[must_use]
    pub fn transcript(&self) -> &'a Vector<Message> {
        &self.state.transcript
    }

    /// Completed rounds, in order.
    #[must_use]
    pub fn rounds(&self) -> &'a Vector<RoundRecord> {
        &self.state.rounds
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&'a Outcome> {
        self.state.outcome()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }
}
