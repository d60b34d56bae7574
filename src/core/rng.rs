//! Deterministic random number generation for agents and game simulations.
//!
//! The engine itself never draws random numbers: turn order and phase
//! transitions are fully determined by submitted actions. Randomness lives
//! at the edges, in reference agents and in game-specific evaluation
//! (e.g. Monte Carlo settlement of a negotiated deal), and it is always
//! seeded so a whole episode can be replayed.
//!
//! ```
//! use rust_parley::core::GameRng;
//!
//! let mut rng = GameRng::new(42);
//!
//! // Each seat gets its own reproducible stream.
//! let mut seat0 = rng.fork();
//! let mut seat1 = rng.fork();
//! assert_ne!(seat0.gen_index(1000), seat1.gen_index(1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, NormalError};

/// Seeded ChaCha8 stream with deterministic forking.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Derive an independent stream. The n-th fork of a given seed is
    /// always the same stream.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Uniform index in `0..upper`. `upper` must be non-zero.
    pub fn gen_index(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..upper)
    }

    /// Uniform float in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Boolean that is true with the given probability.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Normally distributed sample. Fails when `std_dev` is negative or NaN.
    pub fn gen_normal(&mut self, mean: f64, std_dev: f64) -> Result<f64, NormalError> {
        Ok(Normal::new(mean, std_dev)?.sample(&mut self.inner))
    }

    /// Draw from a real-valued distribution on this stream.
    pub fn sample<D: Distribution<f64>>(&mut self, dist: &D) -> f64 {
        dist.sample(&mut self.inner)
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}
