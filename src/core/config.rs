//! Game configuration types.
//!
//! Games configure the engine at startup by providing:
//! - `PhaseSpec`: one sub-stage of a round and its completion rule
//! - `RoundSpec`: the ordered phases of a round plus its scoring multiplier
//! - `RoundPlan`: the round table, indexed by 1-based round number
//! - `GameConfig`: seat count, invalid-action allowance and the plan
//!
//! The engine never hardcodes phases or rounds - games define them.
//! Configuration is validated once by [`GameConfig::validate`] and is
//! read-only for the lifetime of a game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid static configuration, reported when a game is created.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("player count must be between 1 and 255, got {0}")]
    PlayerCount(usize),

    #[error("round plan has no rounds")]
    EmptyPlan,

    #[error("round {0} has no phases")]
    EmptyRound(u32),

    #[error("round {round} phase '{phase}' offers no choice options")]
    NoOptions { round: u32, phase: String },

    #[error("round {round} phase '{phase}' lists option '{option}' twice")]
    DuplicateOption {
        round: u32,
        phase: String,
        option: String,
    },

    #[error("round {round} phase '{phase}' allows zero exchanges")]
    ZeroExchanges { round: u32, phase: String },

    #[error("command set is built for {found} players but the game seats {expected}")]
    CommandSeats { expected: usize, found: usize },

    #[error("round {round} phase '{phase}' cannot finish without the {command} command")]
    MissingCommand {
        round: u32,
        phase: String,
        command: String,
    },

    #[error("invalid pattern for command '{command}': {source}")]
    Pattern {
        command: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid game settings: {0}")]
    Settings(String),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// The two categories of phase the engine knows how to orchestrate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    /// Sequential free-form talk: one actor at a time in round-robin order.
    Communication {
        /// Cap on accepted actions in this phase. `None` for unlimited,
        /// in which case the phase ends only when everyone withdraws.
        max_exchanges: Option<u32>,
        /// Whether `[Whisper to N]` private messages are allowed.
        whispers: bool,
    },
    /// Every eligible player commits exactly one sealed choice.
    SimultaneousChoice {
        /// Allowed choice labels, compared case-insensitively.
        options: Vec<String>,
    },
}

impl PhaseKind {
    /// Short tag for boards and logs.
    #[must_use]
    pub fn tag(&self) -> PhaseTag {
        match self {
            PhaseKind::Communication { .. } => PhaseTag::Communication,
            PhaseKind::SimultaneousChoice { .. } => PhaseTag::SimultaneousChoice,
        }
    }
}

/// Fieldless phase category shown to agents. Serializes in snake case.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseTag {
    Communication,
    SimultaneousChoice,
    /// No phase is running; the game has ended.
    GameOver,
}

impl PhaseTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PhaseTag::Communication => "communication",
            PhaseTag::SimultaneousChoice => "simultaneous_choice",
            PhaseTag::GameOver => "game_over",
        }
    }
}

impl std::fmt::Display for PhaseTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a single phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSpec {
    /// Human-readable name ("talk", "act", "negotiate").
    pub name: String,

    /// Category and completion rule.
    pub kind: PhaseKind,
}

impl PhaseSpec {
    /// A communication phase with whispers enabled and no exchange cap.
    pub fn communication(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PhaseKind::Communication {
                max_exchanges: None,
                whispers: true,
            },
        }
    }

    /// A simultaneous-choice phase over the given labels.
    pub fn choice<S: Into<String>>(name: impl Into<String>, options: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            kind: PhaseKind::SimultaneousChoice {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Cap the number of accepted actions (communication phases only).
    #[must_use]
    pub fn with_max_exchanges(mut self, max: u32) -> Self {
        if let PhaseKind::Communication { max_exchanges, .. } = &mut self.kind {
            *max_exchanges = Some(max);
        }
        self
    }

    /// Disallow private messages (communication phases only).
    #[must_use]
    pub fn without_whispers(mut self) -> Self {
        if let PhaseKind::Communication { whispers, .. } = &mut self.kind {
            *whispers = false;
        }
        self
    }

    /// Find the canonical spelling of a choice label, ignoring case.
    #[must_use]
    pub fn canonical_option(&self, label: &str) -> Option<&str> {
        match &self.kind {
            PhaseKind::SimultaneousChoice { options } => options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(label.trim()))
                .map(String::as_str),
            PhaseKind::Communication { .. } => None,
        }
    }
}

/// Configuration for one round: ordered phases and a scoring coefficient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSpec {
    /// Phases in the order they are played.
    pub phases: Vec<PhaseSpec>,

    /// Coefficient handed to the scoring hook (1 for ordinary rounds).
    pub multiplier: i64,
}

impl RoundSpec {
    /// Create a round from its phases with multiplier 1.
    pub fn new(phases: Vec<PhaseSpec>) -> Self {
        Self {
            phases,
            multiplier: 1,
        }
    }

    /// Set the scoring multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: i64) -> Self {
        self.multiplier = multiplier;
        self
    }
}

/// The round table. Round numbers are 1-based.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPlan {
    rounds: Vec<RoundSpec>,
}

impl RoundPlan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the next round.
    #[must_use]
    pub fn with_round(mut self, round: RoundSpec) -> Self {
        self.rounds.push(round);
        self
    }

    /// Append `count` copies of the same round.
    #[must_use]
    pub fn with_rounds(mut self, count: u32, round: RoundSpec) -> Self {
        for _ in 0..count {
            self.rounds.push(round.clone());
        }
        self
    }

    /// The `RoundSpec` for a 1-based round number.
    #[must_use]
    pub fn round(&self, number: u32) -> Option<&RoundSpec> {
        number
            .checked_sub(1)
            .and_then(|i| self.rounds.get(i as usize))
    }

    /// Get a phase of a round.
    #[must_use]
    pub fn phase(&self, round: u32, index: usize) -> Option<&PhaseSpec> {
        self.round(round).and_then(|r| r.phases.get(index))
    }

    /// The last round number.
    #[must_use]
    pub fn final_round(&self) -> u32 {
        self.rounds.len() as u32
    }

    /// Iterate over (round number, spec) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &RoundSpec)> {
        self.rounds.iter().enumerate().map(|(i, r)| (i as u32 + 1, r))
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of seats (1-255).
    pub player_count: usize,

    /// Invalid actions a player may make before losing further agency.
    /// A player stays eligible while their strikes do not exceed this.
    pub error_allowance: u32,

    /// Round table.
    pub plan: RoundPlan,
}

impl GameConfig {
    /// Create a configuration with an allowance of 3 and an empty plan.
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            error_allowance: 3,
            plan: RoundPlan::new(),
        }
    }

    /// Set the error allowance.
    #[must_use]
    pub fn with_error_allowance(mut self, allowance: u32) -> Self {
        self.error_allowance = allowance;
        self
    }

    /// Set the round plan.
    #[must_use]
    pub fn with_plan(mut self, plan: RoundPlan) -> Self {
        self.plan = plan;
        self
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every structural constraint the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player_count == 0 || self.player_count > 255 {
            return Err(ConfigError::PlayerCount(self.player_count));
        }
        if self.plan.final_round() == 0 {
            return Err(ConfigError::EmptyPlan);
        }

        for (number, round) in self.plan.iter() {
            if round.phases.is_empty() {
                return Err(ConfigError::EmptyRound(number));
            }
            for phase in &round.phases {
                match &phase.kind {
                    PhaseKind::SimultaneousChoice { options } => {
                        if options.is_empty() {
                            return Err(ConfigError::NoOptions {
                                round: number,
                                phase: phase.name.clone(),
                            });
                        }
                        for (i, option) in options.iter().enumerate() {
                            if options[..i].iter().any(|o| o.eq_ignore_ascii_case(option)) {
                                return Err(ConfigError::DuplicateOption {
                                    round: number,
                                    phase: phase.name.clone(),
                                    option: option.clone(),
                                });
                            }
                        }
                    }
                    PhaseKind::Communication { max_exchanges, .. } => {
                        if *max_exchanges == Some(0) {
                            return Err(ConfigError::ZeroExchanges {
                                round: number,
                                phase: phase.name.clone(),
                            });
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
