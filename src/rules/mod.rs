//! Game rules trait for game implementations.
//!
//! Games implement `GameRules` to define:
//! - Prompt text per player
//! - The round-scoring hook
//! - Game-specific commands
//! - The outcome evaluator
//!
//! The core engine calls into `GameRules` but never interprets
//! game-specific concepts directly.

pub mod engine;
pub mod view;

pub use engine::{default_announcement, CommandEffect, GameResult, GameRules, Outcome, PlayerResult, Signal};
pub use view::GameView;
