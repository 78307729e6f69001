use crate::domain::ports::RandomSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source backed by `rand`'s standard generator.
#[derive(Debug, Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A reproducible stream of draws.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for StdRandom {
    fn uniform(&mut self, low: u64, high: u64) -> u64 {
        self.rng.gen_range(low..high)
    }
}

/// Replays a fixed script of draws, cycling when it runs out.
///
/// Each scripted value is an offset from the low bound, wrapped into the
/// requested range; an empty script always yields the low bound.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    draws: Vec<u64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(draws: Vec<u64>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// Every draw yields the low bound of its range.
    pub fn lowest() -> Self {
        Self::default()
    }
}

impl RandomSource for ScriptedRandom {
    fn uniform(&mut self, low: u64, high: u64) -> u64 {
        if self.draws.is_empty() || high <= low {
            return low;
        }
        let offset = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        low + offset % (high - low)
    }
}
