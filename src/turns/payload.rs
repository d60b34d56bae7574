//! Phase payload: the per-phase data bag as a tagged union.
//!
//! Each phase kind carries its own state, so there is no key that can leak
//! from one phase into the next. A new payload is built on every phase
//! entry; nothing is cleared in place.

use serde::{Deserialize, Serialize};

use crate::core::{PhaseKind, PhaseSpec, PhaseTag, PlayerId, PlayerMap};

/// Choices collected in a simultaneous phase, in seat order.
pub type Choices = Vec<(PlayerId, String)>;

/// State of a sequential communication phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunicationState {
    /// Who made the last accepted action. `None` at phase start.
    pub last_actor: Option<PlayerId>,

    /// Players who passed; skipped for the rest of the phase.
    pub withdrawn: PlayerMap<bool>,

    /// Accepted actions so far this phase.
    pub exchanges: u32,

    /// Exchange cap from configuration.
    pub max_exchanges: Option<u32>,

    /// Whether private messages are allowed.
    pub whispers: bool,

    /// Set when a game command ended the phase early.
    pub closed: bool,
}

impl CommunicationState {
    #[must_use]
    pub fn new(player_count: usize, max_exchanges: Option<u32>, whispers: bool) -> Self {
        Self {
            last_actor: None,
            withdrawn: PlayerMap::with_value(player_count, false),
            exchanges: 0,
            max_exchanges,
            whispers,
            closed: false,
        }
    }

    /// Count an accepted action and pass the turn on from `actor`.
    pub fn record_exchange(&mut self, actor: PlayerId) {
        self.exchanges += 1;
        self.last_actor = Some(actor);
    }

    /// Mark a player as withdrawn for the rest of the phase.
    pub fn withdraw(&mut self, player: PlayerId) {
        self.withdrawn[player] = true;
    }

    #[must_use]
    pub fn is_withdrawn(&self, player: PlayerId) -> bool {
        self.withdrawn[player]
    }

    /// Withdrawn players in seat order.
    pub fn withdrawn_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.withdrawn.iter().filter(|(_, w)| **w).map(|(p, _)| p)
    }

    #[must_use]
    pub fn cap_reached(&self) -> bool {
        self.max_exchanges.is_some_and(|max| self.exchanges >= max)
    }
}

/// State of a simultaneous-choice phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceState {
    /// Allowed labels.
    pub options: Vec<String>,

    /// Each player's sealed choice, if made.
    pub choices: PlayerMap<Option<String>>,
}

impl ChoiceState {
    #[must_use]
    pub fn new(player_count: usize, options: Vec<String>) -> Self {
        Self {
            options,
            choices: PlayerMap::with_default(player_count),
        }
    }

    #[must_use]
    pub fn has_chosen(&self, player: PlayerId) -> bool {
        self.choices[player].is_some()
    }

    /// Record a choice. Returns false if the player had already chosen.
    pub fn record(&mut self, player: PlayerId, label: impl Into<String>) -> bool {
        if self.has_chosen(player) {
            return false;
        }
        self.choices[player] = Some(label.into());
        true
    }

    /// Players who have chosen, in seat order.
    pub fn chosen_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.choices.iter().filter(|(_, c)| c.is_some()).map(|(p, _)| p)
    }

    /// Collected choices in seat order.
    #[must_use]
    pub fn collected(&self) -> Choices {
        self.choices
            .iter()
            .filter_map(|(p, c)| c.as_ref().map(|label| (p, label.clone())))
            .collect()
    }
}

/// The per-phase payload owned by the game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhasePayload {
    Communication(CommunicationState),
    SimultaneousChoice(ChoiceState),
    /// Terminal: no further actions.
    GameOver,
}

impl PhasePayload {
    /// Build a fresh payload for entering a phase.
    #[must_use]
    pub fn fresh(spec: &PhaseSpec, player_count: usize) -> Self {
        match &spec.kind {
            PhaseKind::Communication {
                max_exchanges,
                whispers,
            } => PhasePayload::Communication(CommunicationState::new(player_count, *max_exchanges, *whispers)),
            PhaseKind::SimultaneousChoice { options } => {
                PhasePayload::SimultaneousChoice(ChoiceState::new(player_count, options.clone()))
            }
        }
    }

    /// Short tag for boards and logs.
    #[must_use]
    pub fn tag(&self) -> PhaseTag {
        match self {
            PhasePayload::Communication(_) => PhaseTag::Communication,
            PhasePayload::SimultaneousChoice(_) => PhaseTag::SimultaneousChoice,
            PhasePayload::GameOver => PhaseTag::GameOver,
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        matches!(self, PhasePayload::GameOver)
    }

    /// Choices collected so far; empty outside choice phases.
    #[must_use]
    pub fn collected_choices(&self) -> Choices {
        match self {
            PhasePayload::SimultaneousChoice(state) => state.collected(),
            PhasePayload::Communication(_) | PhasePayload::GameOver => Vec::new(),
        }
    }
}
