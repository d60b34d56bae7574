//! Reference driver loop.

use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, Game};
use crate::rules::{GameRules, Outcome};

use super::policy::Agent;

/// Summary of one driven episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Calls to `submit`.
    pub steps: usize,
    pub accepted: usize,
    pub rejected: usize,

    /// Whether the game reached game over within the step cap.
    pub finished: bool,

    pub outcome: Option<Outcome>,
}

/// Drive a game with one agent per seat: observe the current actor, ask
/// its agent for an action, submit, repeat. Stops at game over or after
/// `max_steps` submissions.
///
/// # Panics
///
/// Panics if the number of agents differs from the number of seats.
pub fn run_episode<R: GameRules>(
    game: &mut Game<R>,
    agents: &mut [Box<dyn Agent>],
    max_steps: usize,
) -> Result<EpisodeReport, EngineError> {
    assert_eq!(
        agents.len(),
        game.config().player_count,
        "one agent per seat required"
    );

    let mut report = EpisodeReport {
        steps: 0,
        accepted: 0,
        rejected: 0,
        finished: false,
        outcome: None,
    };

    while report.steps < max_steps {
        let Some(observation) = game.observe() else {
            break;
        };
        let action = agents[observation.player.index()].act(&observation);
        let step = game.submit(observation.player, &action)?;

        report.steps += 1;
        if step.is_accepted() {
            report.accepted += 1;
        } else {
            report.rejected += 1;
        }
        if step.done {
            break;
        }
    }

    report.finished = game.is_game_over();
    report.outcome = game.outcome().cloned();

    tracing::info!(
        steps = report.steps,
        rejected = report.rejected,
        finished = report.finished,
        "episode finished"
    );
    Ok(report)
}
