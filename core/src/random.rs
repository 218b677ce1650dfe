//! Injectable random sources for the mutation passes.

use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform random draws in `[0, 1)`. Passes only ever consume randomness
/// through this trait, so a scripted source reproduces exact states.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f64;

    fn chance(&mut self, probability: f64) -> bool {
        self.next_unit() < probability
    }

    /// Integer in `[0, bound)`; `0` when `bound` is `0`.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        let scaled = (self.next_unit() * f64::from(bound)).floor();
        (scaled.max(0.0) as u32).min(bound - 1)
    }
}

pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of draws.
///
/// Once exhausted it keeps returning [`ScriptedRandom::EXHAUSTED`], which
/// never passes a chance below 1 and always selects the last index.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
}

impl ScriptedRandom {
    pub const EXHAUSTED: f64 = 0.999_999;

    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| v.clamp(0.0, Self::EXHAUSTED))
                .collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(Self::EXHAUSTED)
    }
}
