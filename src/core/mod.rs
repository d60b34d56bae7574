//! Core engine types: players, configuration, messages, state, RNG.
//!
//! This module contains the fundamental building blocks that are game-agnostic.
//! Games configure these via `GameConfig` rather than modifying the core.

pub mod player;
pub mod rng;
pub mod config;
pub mod message;
pub mod state;

pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::{ConfigError, GameConfig, PhaseKind, PhaseSpec, PhaseTag, RoundPlan, RoundSpec};
pub use message::{Message, MessageKind, Sender, Visibility};
pub use state::{GameState, RoundRecord};
