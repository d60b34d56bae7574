//! Reference agents.
//!
//! Agents are trait-based so hosts can plug in anything that turns an
//! observation into a raw action string:
//! - `ScriptedAgent`: replays fixed lines, for tests and demos
//! - `RandomAgent`: seeded random play over the visible vocabulary

use std::collections::VecDeque;

use crate::core::{GameRng, PhaseTag, PlayerId};
use crate::engine::Observation;

/// Anything that can act in a game.
pub trait Agent {
    /// Produce a raw action for the observation.
    fn act(&mut self, observation: &Observation) -> String;
}

impl<F> Agent for F
where
    F: FnMut(&Observation) -> String,
{
    fn act(&mut self, observation: &Observation) -> String {
        self(observation)
    }
}

// =============================================================================
// Scripted Agent
// =============================================================================

/// Replays a queue of lines, then repeats a fallback.
#[derive(Clone, Debug, Default)]
pub struct ScriptedAgent {
    lines: VecDeque<String>,
    fallback: String,
}

impl ScriptedAgent {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            fallback: String::new(),
        }
    }

    /// Line to send once the script runs out.
    #[must_use]
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = fallback.into();
        self
    }

    /// Lines not yet sent.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl Agent for ScriptedAgent {
    fn act(&mut self, _observation: &Observation) -> String {
        self.lines.pop_front().unwrap_or_else(|| self.fallback.clone())
    }
}

// =============================================================================
// Random Agent
// =============================================================================

/// Seeded random play.
///
/// In choice phases it picks a uniformly random option. In communication
/// phases it either samples one of its configured lines or, with none
/// configured, passes, whispers or broadcasts at random.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,
    pass_probability: f64,
    whisper_probability: f64,
    lines: Vec<String>,
    sent: u32,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
            pass_probability: 0.3,
            whisper_probability: 0.2,
            lines: Vec::new(),
            sent: 0,
        }
    }

    /// Build from a forked stream of a parent RNG.
    #[must_use]
    pub fn from_rng(rng: &mut GameRng) -> Self {
        Self::new(rng.fork().seed())
    }

    /// Communication lines to sample from instead of the built-in
    /// broadcast/whisper/pass mix.
    #[must_use]
    pub fn with_lines<S: Into<String>>(mut self, lines: impl IntoIterator<Item = S>) -> Self {
        self.lines = lines.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_pass_probability(mut self, probability: f64) -> Self {
        self.pass_probability = probability;
        self
    }

    #[must_use]
    pub fn with_whisper_probability(mut self, probability: f64) -> Self {
        self.whisper_probability = probability;
        self
    }

    fn talk(&mut self, observation: &Observation) -> String {
        if let Some(line) = self.rng.choose(&self.lines) {
            return line.clone();
        }

        self.sent += 1;
        let me = observation.player;
        let seats = observation.board.player_count;

        if self.rng.gen_bool(self.pass_probability) {
            "[Pass]".to_string()
        } else if observation.board.whispers && seats > 1 && self.rng.gen_bool(self.whisper_probability) {
            let pick = self.rng.gen_index(seats - 1);
            let target = if pick >= me.index() { pick + 1 } else { pick };
            format!("[Whisper to {target}] note {} from {me}", self.sent)
        } else {
            format!("[Broadcast] message {} from {me}", self.sent)
        }
    }
}

impl Agent for RandomAgent {
    fn act(&mut self, observation: &Observation) -> String {
        match observation.board.phase_kind {
            PhaseTag::Communication => self.talk(observation),
            PhaseTag::SimultaneousChoice => self
                .rng
                .choose(&observation.board.options)
                .map(|option| format!("[Choose {option}]"))
                .unwrap_or_default(),
            PhaseTag::GameOver => String::new(),
        }
    }
}

/// One boxed agent per seat.
pub type Seats = Vec<Box<dyn Agent>>;

/// Seat `player_count` random agents on forks of one seed.
#[must_use]
pub fn random_seats(player_count: usize, seed: u64) -> Seats {
    let mut rng = GameRng::new(seed);
    PlayerId::all(player_count)
        .map(|_| Box::new(RandomAgent::from_rng(&mut rng)) as Box<dyn Agent>)
        .collect()
}
