//! Error/Validity Ledger.
//!
//! Tracks per-player strikes against the configured allowance. A strike is
//! charged for every rejected action that tells us something about the
//! player (parse errors, phase validation failures). Once a player's strikes
//! exceed the allowance they lose further agency for the rest of the game,
//! but the game itself always continues.

mod validity;

pub use validity::{Ledger, LedgerEntry, Strike, StrikeVerdict};
