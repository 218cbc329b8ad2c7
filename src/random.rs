use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Randomness for color assignment and identifier allocation.
pub trait RandomSource: Send {
    /// Uniform draw from `low..=high`.
    fn next_in(&mut self, low: u32, high: u32) -> u32;

    /// Fair coin flip.
    fn next_bool(&mut self) -> bool;
}

/// Production source backed by the `rand` crate.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        StdRandom { rng: StdRng::from_entropy() }
    }

    /// Reproducible sequence, for simulations.
    pub fn seeded(seed: u64) -> Self {
        StdRandom { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn next_in(&mut self, low: u32, high: u32) -> u32 {
        self.rng.gen_range(low..=high)
    }

    fn next_bool(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}

/// Replays fixed values, then falls back to a seeded generator once the
/// script runs out. Scripted numbers are clamped into the requested range.
#[cfg(test)]
pub struct ScriptedRandom {
    numbers: std::collections::VecDeque<u32>,
    coins: std::collections::VecDeque<bool>,
    fallback: StdRandom,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(numbers: impl IntoIterator<Item = u32>, coins: impl IntoIterator<Item = bool>) -> Self {
        ScriptedRandom {
            numbers: numbers.into_iter().collect(),
            coins: coins.into_iter().collect(),
            fallback: StdRandom::seeded(0),
        }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_in(&mut self, low: u32, high: u32) -> u32 {
        match self.numbers.pop_front() {
            Some(n) => n.clamp(low, high),
            None => self.fallback.next_in(low, high),
        }
    }

    fn next_bool(&mut self) -> bool {
        match self.coins.pop_front() {
            Some(b) => b,
            None => self.fallback.next_bool(),
        }
    }
}
