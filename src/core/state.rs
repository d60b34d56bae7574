//! Game state: the single owned aggregate for one game instance.
//!
//! ## GameState
//!
//! Everything the engine mutates lives here:
//! - Round and phase position
//! - The phase payload (tagged per phase kind)
//! - The message transcript
//! - The validity ledger
//! - Running scores and the round-by-round record
//! - The outcome, once the game is over
//!
//! The turn selector and the phase machine own nothing; they read and
//! write this struct. Collections use `im` persistent structures so a
//! whole game is cheap to clone for hosts that branch or snapshot.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::message::Message;
use super::player::{PlayerId, PlayerMap};
use crate::ledger::Ledger;
use crate::rules::Outcome;
use crate::turns::{Choices, PhasePayload};

/// One completed round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 1-based round number.
    pub round: u32,

    /// Scoring coefficient from the round plan.
    pub multiplier: i64,

    /// Choices submitted during the round, in seat order.
    pub choices: Choices,

    /// Score change per player returned by the scoring hook.
    pub deltas: PlayerMap<i64>,
}

impl RoundRecord {
    /// The label a player chose this round, if any.
    #[must_use]
    pub fn choice_of(&self, player: PlayerId) -> Option<&str> {
        self.choices
            .iter()
            .find(|(p, _)| *p == player)
            .map(|(_, label)| label.as_str())
    }
}

/// Complete state of one game instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    player_count: usize,

    /// Current round (1-based). Stays on the last played round once the
    /// game is over.
    pub round: u32,

    /// Index of the current phase within the round.
    pub phase_index: usize,

    /// Per-phase data. Rebuilt on every phase entry.
    pub payload: PhasePayload,

    /// Every accepted action and every transition announcement.
    pub transcript: Vector<Message>,

    /// Strike counts and eligibility.
    pub ledger: Ledger,

    /// Running score per player.
    pub scores: PlayerMap<i64>,

    /// Completed rounds, in order.
    pub rounds: Vector<RoundRecord>,

    /// Choices banked from finished choice phases of the current round.
    pub round_choices: Choices,

    /// Messages stamped so far in the current phase.
    pub phase_sequence: u32,

    /// Set when a game command asked to end the game after this round.
    pub finish_requested: bool,

    /// The obligated actor, maintained by the engine's settle step only.
    pub(crate) actor: Option<PlayerId>,

    /// Final result, written exactly once on entering game over.
    pub(crate) outcome: Option<Outcome>,

    /// Per-player read position into the transcript.
    pub(crate) cursors: PlayerMap<usize>,
}

impl GameState {
    /// Create the state for round 1, phase 0.
    ///
    /// `payload` must already be the fresh payload of that phase.
    #[must_use]
    pub fn new(player_count: usize, error_allowance: u32, payload: PhasePayload) -> Self {
        Self {
            player_count,
            round: 1,
            phase_index: 0,
            payload,
            transcript: Vector::new(),
            ledger: Ledger::new(player_count, error_allowance),
            scores: PlayerMap::with_value(player_count, 0),
            rounds: Vector::new(),
            round_choices: Vec::new(),
            phase_sequence: 0,
            finish_requested: false,
            actor: None,
            outcome: None,
            cursors: PlayerMap::with_value(player_count, 0),
        }
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count)
    }

    /// The player the engine is waiting on, or `None` once the game is over.
    #[must_use]
    pub fn actor(&self) -> Option<PlayerId> {
        self.actor
    }

    /// The final result, once the game is over.
    #[must_use]
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.payload.is_game_over()
    }

    /// Stamp a message with the current round and phase sequence and
    /// append it to the transcript.
    pub fn push_message(&mut self, message: Message) {
        let stamped = message.stamped(self.round, self.phase_sequence);
        self.phase_sequence += 1;
        self.transcript.push_back(stamped);
    }

    /// Move a player's read cursor to the end of the transcript, returning
    /// the messages they had not yet seen.
    pub fn take_unread(&mut self, player: PlayerId) -> Vector<Message> {
        let start = self.cursors[player].min(self.transcript.len());
        self.cursors[player] = self.transcript.len();
        self.transcript.clone().slice(start..)
    }

    /// Add a round's deltas to the running scores.
    pub fn apply_deltas(&mut self, deltas: &PlayerMap<i64>) {
        for (player, delta) in deltas.iter() {
            self.scores[player] += *delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MessageKind, Visibility};
    use crate::turns::CommunicationState;

    fn talk_state(players: usize) -> GameState {
        GameState::new(
            players,
            3,
            PhasePayload::Communication(CommunicationState::new(players, None, true)),
        )
    }

    #[test]
    fn test_new_state_defaults() {
        let state = talk_state(4);
        assert_eq!(state.player_count(), 4);
        assert_eq!(state.round, 1);
        assert_eq!(state.phase_index, 0);
        assert!(state.transcript.is_empty());
        assert_eq!(state.scores.values().sum::<i64>(), 0);
        assert_eq!(state.actor(), None);
        assert!(state.outcome().is_none());
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_push_message_stamps_sequence() {
        let mut state = talk_state(2);
        state.round = 3;
        state.push_message(Message::announcement("a"));
        state.push_message(Message::from_player(
            PlayerId::new(0),
            MessageKind::Remark,
            Visibility::Public,
            "b",
        ));

        let stamps: Vec<_> = state.transcript.iter().map(|m| (m.round, m.sequence)).collect();
        assert_eq!(stamps, vec![(3, 0), (3, 1)]);
    }

    #[test]
    fn test_take_unread_advances_cursor() {
        let mut state = talk_state(2);
        let p0 = PlayerId::new(0);
        state.push_message(Message::announcement("one"));

        assert_eq!(state.take_unread(p0).len(), 1);
        assert!(state.take_unread(p0).is_empty());

        state.push_message(Message::announcement("two"));
        let unread = state.take_unread(p0);
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].content, "two");

        // Other seats keep their own cursor.
        assert_eq!(state.take_unread(PlayerId::new(1)).len(), 2);
    }

    #[test]
    fn test_apply_deltas_accumulates() {
        let mut state = talk_state(3);
        let deltas = PlayerMap::new(3, |p| p.index() as i64 - 1);
        state.apply_deltas(&deltas);
        state.apply_deltas(&deltas);
        assert_eq!(state.scores.values().copied().collect::<Vec<_>>(), vec![-2, 0, 2]);
    }

    #[test]
    fn test_round_record_lookup() {
        let record = RoundRecord {
            round: 1,
            multiplier: 1,
            choices: vec![(PlayerId::new(1), "Y".into())],
            deltas: PlayerMap::with_value(2, 0),
        };
        assert_eq!(record.choice_of(PlayerId::new(1)), Some("Y"));
        assert_eq!(record.choice_of(PlayerId::new(0)), None);
    }
}
