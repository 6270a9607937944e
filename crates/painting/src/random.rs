//! Injectable randomness
//!
//! Every stochastic decision in the engine (jitter, erase rolls, smudge
//! marks, texture dots, style and mapping shuffles) draws from a
//! [`RandomSource`], so tests can script the exact sequence of draws.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// `true` when a draw lands below `probability`.
    fn chance(&mut self, probability: f32) -> bool {
        self.next_f32() < probability
    }

    /// Uniform draw in `[min, max)`.
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform draw in `[-0.5, 0.5)`.
    fn centered(&mut self) -> f32 {
        self.next_f32() - 0.5
    }

    /// Uniform index in `0..len`. Returns 0 for an empty range.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f32() * len as f32) as usize).min(len - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }
}

/// `rand`-backed source used at runtime.
pub struct ThreadRandom {
    rng: StdRng,
}

impl ThreadRandom {
    /// Seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible source for demos and replays
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_f32(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// An empty list always yields 0.5, which zeroes every centered jitter.
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Always returns `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_f32(&mut self) -> f32 {
        let value = if self.values.is_empty() {
            0.5
        } else {
            self.values[self.cursor % self.values.len()]
        };
        self.cursor += 1;
        value
    }
}
