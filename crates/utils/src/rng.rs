use bevy::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Random source shared by gameplay systems.
///
/// A fixed seed makes spawn point selection reproducible between runs.
/// Without one a seed is drawn, so any run can be replayed.
#[derive(Resource, Debug, Clone)]
pub struct GameRng {
    seed: u64,
    inner: StdRng,
}

impl GameRng {
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        Self {
            seed,
            inner: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform index in `0..len`. `len` must not be zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.gen_range(0..len)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(None)
    }
}
