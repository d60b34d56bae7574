//! Visibility Router.
//!
//! Given a message, computes what each player gets to read. Public and
//! admin messages reach everyone identically; a private message's content
//! reaches only its sender and target while everyone else learns that some
//! private exchange took place; a sealed choice is shown only to the player
//! who made it.
//!
//! Routing is pure. Storing messages in the transcript is the engine's job.

mod router;

pub use router::{render_for, route, Deliveries, Delivery, PRIVATE_NOTICE};
