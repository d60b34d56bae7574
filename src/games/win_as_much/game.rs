//! Win as Much as You Can implementation.

use crate::core::{ConfigError, GameConfig, PhaseSpec, PlayerId, PlayerMap, RoundPlan, RoundSpec};
use crate::engine::{EngineError, Game};
use crate::parser::CommandSet;
use crate::rules::{GameResult, GameRules, GameView, Outcome};
use crate::turns::{Choices, PhasePayload};

/// Seats at the table.
pub const PLAYERS: usize = 4;

/// Scored rounds.
pub const ROUNDS: u32 = 10;

/// Rounds preceded by a talk phase, with their multipliers.
pub const TALK_ROUNDS: [(u32, i64); 3] = [(5, 3), (8, 5), (10, 10)];

/// Exchange cap for a talk phase (10 per player).
pub const MAX_TALK: u32 = 40;

/// Base points per chooser of each label as (X points, Y points).
///
/// All X: every X loses 1. All Y: every Y wins 1. Otherwise each X wins
/// one point per Y chooser and each Y loses one point per X chooser, which
/// reproduces the 4-player table (1X: +3/-1, 2X: +2/-2, 3X: +1/-3).
#[must_use]
pub fn base_points(x_count: usize, y_count: usize) -> (i64, i64) {
    match (x_count, y_count) {
        (_, 0) => (-1, 0),
        (0, _) => (0, 1),
        (x, y) => (y as i64, -(x as i64)),
    }
}

/// The 10-round plan.
#[must_use]
pub fn plan() -> RoundPlan {
    (1..=ROUNDS).fold(RoundPlan::new(), |plan, round| {
        let act = PhaseSpec::choice("act", ["X", "Y"]);
        let spec = match TALK_ROUNDS.iter().find(|(r, _)| *r == round) {
            Some((_, multiplier)) => RoundSpec::new(vec![
                PhaseSpec::communication("talk").with_max_exchanges(MAX_TALK),
                act,
            ])
            .with_multiplier(*multiplier),
            None => RoundSpec::new(vec![act]),
        };
        plan.with_round(spec)
    })
}

#[must_use]
pub fn config(error_allowance: u32) -> GameConfig {
    GameConfig::new(PLAYERS)
        .with_error_allowance(error_allowance)
        .with_plan(plan())
}

/// Broadcast, whisper, pass and choose.
pub fn commands() -> Result<CommandSet, ConfigError> {
    CommandSet::standard(PLAYERS)
}

/// Start a game with the given error allowance.
pub fn new_game(error_allowance: u32) -> Result<Game<WinAsMuchRules>, EngineError> {
    Game::create(config(error_allowance), commands()?, WinAsMuchRules)
}

/// Rules for Win as Much as You Can.
#[derive(Clone, Copy, Debug, Default)]
pub struct WinAsMuchRules;

impl GameRules for WinAsMuchRules {
    fn prompt(&self, player: PlayerId, view: &GameView<'_>) -> String {
        let mut prompt = format!(
            "You are {player} in Win as Much as You Can.\n\n\
             OBJECTIVE:\n\
             Earn the most points possible over {ROUNDS} rounds by choosing X or Y.\n\n\
             SCORING (per round, times the round multiplier):\n\
             - 1 X and 3 Y's: X wins 3, Y's lose 1 each\n\
             - 2 X's and 2 Y's: X's win 2 each, Y's lose 2 each\n\
             - 3 X's and 1 Y: X's win 1 each, Y loses 3\n\
             - 4 X's: all X's lose 1 each\n\
             - 4 Y's: all Y's win 1 each\n\n\
             TALK PHASES (rounds 5, 8 and 10):\n\
             - [Broadcast] message: public message\n\
             - [Whisper to N] message: private message to player N\n\
             - [Pass]: stop talking for this phase\n\
             - The phase ends after {MAX_TALK} exchanges or when everyone has passed\n\n\
             ACT PHASES:\n\
             - [Choose X] or [Choose Y]; choices are revealed when the round is scored\n\n\
             CURRENT STATUS:\n\
             Round {}/{} (multiplier {}x)\n",
            view.round(),
            view.final_round(),
            view.multiplier(),
        );

        match view.payload() {
            PhasePayload::Communication(talk) => {
                let passed: Vec<_> = talk.withdrawn_players().map(|p| p.0.to_string()).collect();
                prompt.push_str(&format!(
                    "Phase: TALK\nExchanges: {}/{}\nPassed: {}\nYour turn to speak: {}\n",
                    talk.exchanges,
                    talk.max_exchanges.unwrap_or(MAX_TALK),
                    if passed.is_empty() { "none".to_string() } else { passed.join(", ") },
                    if view.actor() == Some(player) { "YES" } else { "NO" },
                ));
            }
            PhasePayload::SimultaneousChoice(choice) => {
                let chosen: Vec<_> = choice.chosen_players().map(|p| p.0.to_string()).collect();
                prompt.push_str(&format!(
                    "Phase: ACT\nPlayers who chose: {}\nYour choice needed: {}\n",
                    if chosen.is_empty() { "none".to_string() } else { chosen.join(", ") },
                    if choice.has_chosen(player) { "NO" } else { "YES" },
                ));
            }
            PhasePayload::GameOver => prompt.push_str("Phase: GAME OVER\n"),
        }

        let scores: Vec<_> = view.scores().iter().map(|(p, s)| format!("{p}: {s}")).collect();
        prompt.push_str(&format!("Scores: {}", scores.join(", ")));
        prompt
    }

    fn score_round(&mut self, _round: u32, multiplier: i64, choices: &Choices, view: &GameView<'_>) -> PlayerMap<i64> {
        let x_count = choices.iter().filter(|(_, c)| c == "X").count();
        let y_count = choices.len() - x_count;
        let (x_points, y_points) = base_points(x_count, y_count);

        let mut deltas = PlayerMap::with_value(view.player_count(), 0);
        for (player, choice) in choices {
            let base = if choice == "X" { x_points } else { y_points };
            deltas[*player] = base * multiplier;
        }
        deltas
    }

    fn evaluate(&mut self, view: &GameView<'_>) -> Outcome {
        let scores = view.scores();
        let best = scores.values().copied().max().unwrap_or(0);
        let winners: Vec<_> = scores.iter().filter(|(_, s)| **s == best).map(|(p, _)| p).collect();

        let summary = match winners.as_slice() {
            [winner] => format!("{winner} wins with {best} points"),
            _ => {
                let names: Vec<_> = winners.iter().map(|p| p.0.to_string()).collect();
                format!("Tie between players {} with {best} points each", names.join(", "))
            }
        };
        let result = GameResult::from_winners(winners);

        // Nobody earns a win from a non-positive score.
        if best > 0 {
            Outcome::win_loss(view.player_count(), result, summary)
        } else {
            Outcome::with_rewards(result, PlayerMap::with_value(view.player_count(), 0.0), summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_points_match_four_player_table() {
        assert_eq!(base_points(1, 3), (3, -1));
        assert_eq!(base_points(2, 2), (2, -2));
        assert_eq!(base_points(3, 1), (1, -3));
        assert_eq!(base_points(4, 0), (-1, 0));
        assert_eq!(base_points(0, 4), (0, 1));
    }

    #[test]
    fn test_plan_shape() {
        let plan = plan();
        assert_eq!(plan.final_round(), 10);
        for round in 1..=10 {
            let spec = plan.round(round).unwrap();
            match round {
                5 | 8 | 10 => {
                    assert_eq!(spec.phases.len(), 2);
                    assert_eq!(spec.phases[0].name, "talk");
                }
                _ => {
                    assert_eq!(spec.phases.len(), 1);
                    assert_eq!(spec.multiplier, 1);
                }
            }
        }
        assert_eq!(plan.round(5).unwrap().multiplier, 3);
        assert_eq!(plan.round(8).unwrap().multiplier, 5);
        assert_eq!(plan.round(10).unwrap().multiplier, 10);
        assert!(config(3).validate().is_ok());
    }

    #[test]
    fn test_prompt_mentions_status() {
        let game = new_game(3).unwrap();
        let prompt = WinAsMuchRules.prompt(PlayerId::new(2), &game.view());
        assert!(prompt.starts_with("You are Player 2"));
        assert!(prompt.contains("Round 1/10 (multiplier 1x)"));
        assert!(prompt.contains("Phase: ACT"));
        assert!(prompt.contains("Your choice needed: YES"));
    }
}
