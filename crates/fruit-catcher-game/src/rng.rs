use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the uniform draws used when spawning fruit.
///
/// The engine keeps a single source for the whole session; it is never
/// re-seeded between rounds.
pub trait RandomSource {
    /// Uniform integer in `[low, high]`, both inclusive.
    fn uniform(&mut self, low: u32, high: u32) -> u32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn uniform(&mut self, low: u32, high: u32) -> u32 {
        (**self).uniform(low, high)
    }
}

/// Default generator.
pub struct GameRng(pub StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for GameRng {
    fn uniform(&mut self, low: u32, high: u32) -> u32 {
        if low >= high {
            return low;
        }
        self.0.gen_range(low..=high)
    }
}
