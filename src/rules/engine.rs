//! Game rules trait for game implementations.
//!
//! Games implement `GameRules` to supply:
//! - Prompts for each player
//! - Round scoring
//! - Game-specific commands
//! - Final evaluation
//! - Transition announcements

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, PlayerMap};
use crate::phases::Transition;
use crate::turns::Choices;

use super::view::GameView;

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Draw (no winner).
    Draw,
    /// Multiple winners (exact tie on the winning score).
    Winners(Vec<PlayerId>),
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }

    /// Build a result from a list of top players: one is a single winner,
    /// several are co-winners, none is a draw.
    #[must_use]
    pub fn from_winners(mut winners: Vec<PlayerId>) -> Self {
        match winners.len() {
            0 => GameResult::Draw,
            1 => GameResult::Winner(winners[0]),
            _ => {
                winners.sort();
                GameResult::Winners(winners)
            }
        }
    }
}

/// One player's final reward.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub reward: f64,
    pub reason: String,
}

/// Final result of a game, computed once when the game ends.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Reward and reason per player.
    pub players: PlayerMap<PlayerResult>,

    /// Winner designation.
    pub result: GameResult,

    /// Human-readable summary.
    pub summary: String,
}

impl Outcome {
    /// Build an outcome where every player shares the same reason.
    pub fn with_rewards(result: GameResult, rewards: PlayerMap<f64>, summary: impl Into<String>) -> Self {
        let summary = summary.into();
        Self {
            players: rewards.map(|_, reward| PlayerResult {
                reward: *reward,
                reason: summary.clone(),
            }),
            result,
            summary,
        }
    }

    /// Winners get +1, everyone else -1; a draw gives everyone 0.
    #[must_use]
    pub fn win_loss(player_count: usize, result: GameResult, summary: impl Into<String>) -> Self {
        let rewards = PlayerMap::new(player_count, |p| match &result {
            GameResult::Draw => 0.0,
            r if r.is_winner(p) => 1.0,
            _ => -1.0,
        });
        Self::with_rewards(result, rewards, summary)
    }

    /// A player's reward.
    #[must_use]
    pub fn reward(&self, player: PlayerId) -> f64 {
        self.players[player].reward
    }
}

/// What a game command asks the engine to do next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    /// Keep going; the action counts as one exchange.
    #[default]
    Continue,
    /// Close the current communication phase.
    EndPhase,
    /// Close the current round and end the game.
    FinishGame,
}

/// An accepted game command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandEffect {
    /// Public text, rendered after the sender's name.
    pub content: String,

    pub signal: Signal,
}

impl CommandEffect {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            signal: Signal::Continue,
        }
    }

    #[must_use]
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = signal;
        self
    }
}

/// Game rules trait.
///
/// The engine owns turn order, validation of the built-in commands and
/// phase transitions. Everything that depends on a particular game goes
/// through this trait.
///
/// ## Implementation Notes
///
/// - `score_round`: called once per completed round, with only the choices
///   that were actually submitted
/// - `on_command`: called for game-registered commands during
///   communication phases; an `Err` is charged to the player as a strike
/// - `evaluate`: called exactly once, after the last round is recorded
pub trait GameRules {
    /// Prompt text for a player.
    fn prompt(&self, player: PlayerId, view: &GameView<'_>) -> String;

    /// Score deltas for a completed round. Defaults to no change.
    fn score_round(&mut self, round: u32, multiplier: i64, choices: &Choices, view: &GameView<'_>) -> PlayerMap<i64> {
        let _ = (round, multiplier, choices);
        PlayerMap::with_value(view.player_count(), 0)
    }

    /// Handle a game-registered command. Returns the public content on
    /// success or an actionable reason on failure.
    fn on_command(
        &mut self,
        player: PlayerId,
        name: &str,
        body: &str,
        view: &GameView<'_>,
    ) -> Result<CommandEffect, String> {
        let _ = (player, body, view);
        Err(format!("[{name}] is not available in this game"))
    }

    /// Fold the round record into the final outcome.
    fn evaluate(&mut self, view: &GameView<'_>) -> Outcome;

    /// Referee text for a phase or round transition.
    fn announce(&self, transition: &Transition, view: &GameView<'_>) -> String {
        default_announcement(transition, view)
    }
}

/// Standard referee wording for transitions.
#[must_use]
pub fn default_announcement(transition: &Transition, view: &GameView<'_>) -> String {
    match transition {
        Transition::NextPhase { round, phase } => format!("Round {round} - {phase} phase begins"),
        Transition::NextRound { record, round, phase } => {
            format!(
                "{} Round {round} - {phase} phase begins",
                round_results(record, view)
            )
        }
        Transition::GameOver { record } => {
            let mut text = round_results(record, view);
            text.push_str(" GAME OVER - Final scores: ");
            let scores: Vec<_> = view
                .scores()
                .iter()
                .map(|(p, s)| format!("{p}: {s}"))
                .collect();
            text.push_str(&scores.join(", "));
            if let Some(outcome) = view.outcome() {
                text.push_str(". ");
                text.push_str(&outcome.summary);
            }
            text
        }
    }
}

fn round_results(record: &crate::core::RoundRecord, view: &GameView<'_>) -> String {
    let choices = if record.choices.is_empty() {
        "no choices".to_string()
    } else {
        record
            .choices
            .iter()
            .map(|(p, label)| format!("{p}: {label}"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let points: Vec<_> = record
        .deltas
        .iter()
        .map(|(p, d)| format!("{p} {d:+} (Total: {})", view.scores()[p]))
        .collect();
    format!("Round {} Results: {choices}. {}.", record.round, points.join(", "))
}
