//! # rust-parley
//!
//! A turn and phase orchestration engine for multi-agent text games.
//!
//! ## Design Principles
//!
//! 1. **Game-Agnostic**: No hardcoded rounds, phases or commands. Games
//!    describe their structure with a `RoundPlan` and a `CommandSet`, and
//!    plug scoring and prompts in through `GameRules`.
//!
//! 2. **N-Player First**: Every API takes `player_count` as context.
//!    Per-player data lives in `PlayerMap`.
//!
//! 3. **Text In, Text Out**: Agents submit raw strings and read rendered
//!    feeds. Malformed input costs a strike, never a crash.
//!
//! ## Architecture
//!
//! - **Single Actor**: Exactly one player may act at any time. The engine
//!   recomputes the actor after every accepted or rejected action.
//!
//! - **Persistent Data Structures**: Transcript and round history use
//!   `im-rs`, so snapshots of a game are cheap to clone.
//!
//! - **Tagged Phase Payloads**: Each phase carries its own state, replaced
//!   wholesale on every transition.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, configuration, messages and game state
//! - `parser`: Bracketed command recognition
//! - `routing`: Per-player message visibility
//! - `turns`: Phase payloads and actor selection
//! - `phases`: Round and phase transitions
//! - `ledger`: Strikes and eligibility
//! - `rules`: `GameRules` trait for game implementations
//! - `engine`: The `Game` orchestrator and its errors
//! - `agents`: Agent trait, baseline agents and an episode runner
//! - `games`: Bundled games

pub mod core;
pub mod parser;
pub mod routing;
pub mod turns;
pub mod phases;
pub mod ledger;
pub mod rules;
pub mod engine;
pub mod agents;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    ConfigError, GameConfig, GameRng, GameState, Message, MessageKind, PhaseKind, PhaseSpec, PhaseTag, PlayerId, PlayerMap,
    RoundPlan, RoundRecord, RoundSpec, Sender, Visibility,
};

pub use crate::parser::{Command, CommandKind, CommandSet, ParseError, ParsedAction};

pub use crate::routing::{render_for, route, Delivery};

pub use crate::turns::{next_actor, NextActor, PhasePayload};

pub use crate::phases::Transition;

pub use crate::ledger::{Ledger, StrikeVerdict};

pub use crate::rules::{CommandEffect, GameResult, GameRules, GameView, Outcome, PlayerResult, Signal};

pub use crate::engine::{
    BoardState, EngineError, Game, IneligibleActorError, IneligibleReason, Observation, Step, Verdict,
};

pub use crate::agents::{run_episode, Agent, EpisodeReport, RandomAgent, ScriptedAgent};
