//! Phase state machine.
//!
//! Phases come from the game's round plan; the machine only knows the two
//! phase kinds and the terminal game-over state. Payloads are always
//! rebuilt on entry, never cleared in place.

pub mod machine;

pub use machine::{advance, bank_choices, enter_game_over, enter_phase, record_round, Advance, Transition};
