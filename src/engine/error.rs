//! Engine error taxonomy.
//!
//! Player mistakes (malformed or disallowed actions) are not errors here:
//! they come back from `submit` as an invalid verdict and cost a strike.
//! These types cover driver protocol violations and engine bugs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ConfigError, PlayerId};

/// Why a player may not act right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IneligibleReason {
    /// The game has ended.
    GameOver,
    /// The player exceeded the error allowance.
    Eliminated,
    /// Sequential phase and another player holds the turn.
    NotYourTurn { expected: PlayerId },
    /// The player already committed a choice this phase.
    AlreadyChosen,
    /// The seat does not exist in this game.
    NotSeated,
}

/// A submission the engine refused without charging a strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{player} cannot act: {}", describe(.reason))]
pub struct IneligibleActorError {
    pub player: PlayerId,
    pub reason: IneligibleReason,
}

fn describe(reason: &IneligibleReason) -> String {
    match reason {
        IneligibleReason::GameOver => "the game is over".to_string(),
        IneligibleReason::Eliminated => "eliminated after exceeding the error allowance".to_string(),
        IneligibleReason::NotYourTurn { expected } => format!("it is {expected}'s turn"),
        IneligibleReason::AlreadyChosen => "a choice was already made this phase".to_string(),
        IneligibleReason::NotSeated => "no such seat in this game".to_string(),
    }
}

/// Errors returned by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ineligible(#[from] IneligibleActorError),

    /// Internal consistency failure. Indicates an engine bug.
    #[error("phase invariant violated: {0}")]
    PhaseInvariant(String),
}

impl EngineError {
    pub(crate) fn ineligible(player: PlayerId, reason: IneligibleReason) -> Self {
        EngineError::Ineligible(IneligibleActorError { player, reason })
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        EngineError::PhaseInvariant(message.into())
    }

    /// The refusal reason, when this is a driver protocol violation.
    #[must_use]
    pub fn ineligible_reason(&self) -> Option<IneligibleReason> {
        match self {
            EngineError::Ineligible(err) => Some(err.reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ineligible_messages() {
        let err = EngineError::ineligible(
            PlayerId::new(2),
            IneligibleReason::NotYourTurn {
                expected: PlayerId::new(0),
            },
        );
        assert_eq!(err.to_string(), "Player 2 cannot act: it is Player 0's turn");
        assert_eq!(
            err.ineligible_reason(),
            Some(IneligibleReason::NotYourTurn {
                expected: PlayerId::new(0)
            })
        );

        let err = EngineError::ineligible(PlayerId::new(1), IneligibleReason::GameOver);
        assert!(err.to_string().contains("the game is over"));
    }

    #[test]
    fn test_invariant_is_not_ineligible() {
        let err = EngineError::invariant("outcome evaluated twice");
        assert_eq!(err.ineligible_reason(), None);
        assert_eq!(err.to_string(), "phase invariant violated: outcome evaluated twice");
    }
}
