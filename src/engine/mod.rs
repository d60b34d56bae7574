//! Game engine: the host-facing API.
//!
//! - `Game::create` validates configuration and starts round 1
//! - `Game::observe` / `Game::observe_for` render prompt, board and feed
//! - `Game::submit` applies one raw action
//! - `Game::outcome` returns the final result once the game is over

pub mod board;
pub mod error;
pub mod game;

pub use board::{BoardState, Observation};
pub use error::{EngineError, IneligibleActorError, IneligibleReason};
pub use game::{Game, Step, Verdict};
