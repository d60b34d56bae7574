//! Structured board state and per-player observations.

use serde::{Deserialize, Serialize};

use crate::core::{PhaseTag, PlayerId, PlayerMap};
use crate::rules::GameView;
use crate::turns::PhasePayload;

/// Structured snapshot of the public game position.
///
/// Choice contents are never included, only who has chosen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardState {
    pub player_count: usize,
    pub round: u32,
    pub final_round: u32,

    /// Current phase name; `None` once the game is over.
    pub phase: Option<String>,

    /// Payload category; serializes as `communication`, `simultaneous_choice` or `game_over`.
    pub phase_kind: PhaseTag,

    pub multiplier: i64,
    pub actor: Option<PlayerId>,
    pub scores: PlayerMap<i64>,
    pub strikes: PlayerMap<u32>,
    pub eligible: PlayerMap<bool>,

    /// Players who passed this communication phase.
    pub withdrawn: Vec<PlayerId>,

    /// Players who committed a choice this phase.
    pub chosen: Vec<PlayerId>,

    /// Allowed labels in a choice phase.
    pub options: Vec<String>,

    /// Accepted actions in this communication phase.
    pub exchanges: u32,
    pub max_exchanges: Option<u32>,

    /// Whether private messages are allowed right now.
    pub whispers: bool,
}

impl BoardState {
    /// Capture the board from a view.
    #[must_use]
    pub fn capture(view: &GameView<'_>) -> Self {
        let entries = view.ledger().entries();
        let mut board = Self {
            player_count: view.player_count(),
            round: view.round(),
            final_round: view.final_round(),
            phase: view.phase().map(|p| p.name.clone()),
            phase_kind: view.payload().tag(),
            multiplier: view.multiplier(),
            actor: view.actor(),
            scores: view.scores().clone(),
            strikes: entries.map(|_, e| e.strikes),
            eligible: entries.map(|_, e| e.eligible),
            withdrawn: Vec::new(),
            chosen: Vec::new(),
            options: Vec::new(),
            exchanges: 0,
            max_exchanges: None,
            whispers: false,
        };

        match view.payload() {
            PhasePayload::Communication(talk) => {
                board.withdrawn = talk.withdrawn_players().collect();
                board.exchanges = talk.exchanges;
                board.max_exchanges = talk.max_exchanges;
                board.whispers = talk.whispers;
            }
            PhasePayload::SimultaneousChoice(choice) => {
                board.chosen = choice.chosen_players().collect();
                board.options = choice.options.clone();
            }
            PhasePayload::GameOver => {}
        }

        board
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_none()
    }
}

/// What one player sees when polled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// The observing player.
    pub player: PlayerId,

    /// Whether the engine is waiting on this player.
    pub is_turn: bool,

    /// Game-rendered prompt.
    pub prompt: String,

    pub board: BoardState,

    /// Rendered lines the player had not yet seen, oldest first.
    pub feed: Vec<String>,
}
