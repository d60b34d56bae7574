//! Turn bookkeeping: per-phase payloads and the turn selector.
//!
//! The payload is the only mutable per-phase data. The selector is a pure
//! function of the payload and the validity ledger, so the current actor
//! can always be recomputed from state.

pub mod payload;
pub mod selector;

pub use payload::{ChoiceState, Choices, CommunicationState, PhasePayload};
pub use selector::{next_actor, NextActor};
