//! Bundled games.
//!
//! Each game supplies a round plan, a command vocabulary and a
//! [`GameRules`](crate::rules::GameRules) implementation.

pub mod negotiation;
pub mod win_as_much;
