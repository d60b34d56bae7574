//! Reference agents and the episode driver.
//!
//! The engine itself never asks anyone for input; a host drives it. This
//! module is the simplest such host: one `Agent` per seat and a loop.

pub mod episode;
pub mod policy;

pub use episode::{run_episode, EpisodeReport};
pub use policy::{random_seats, Agent, RandomAgent, ScriptedAgent, Seats};
