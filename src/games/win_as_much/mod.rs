//! Win as Much as You Can.
//!
//! A 4-player public-goods game:
//! - 10 rounds, each ending with a simultaneous X/Y choice
//! - Rounds 5, 8 and 10 open with a talk phase (40 exchanges max)
//!   and score at 3x, 5x and 10x
//! - Highest total wins; rewards are +1/-1, or 0 for everyone when the
//!   best score is not positive

mod game;

pub use game::{base_points, commands, config, new_game, plan, WinAsMuchRules, MAX_TALK, PLAYERS, ROUNDS, TALK_ROUNDS};
