//! Sources of the per-turn random draw.
//!
//! The engine takes its randomness as a parameter so tests can force a
//! specific draw and replays can reuse a seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform draws in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

/// Deterministic generator for reproducible games.
#[derive(Debug, Clone)]
pub struct SeededRng {
    rng: StdRng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded from OS entropy, for interactive play.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRng {
    fn next_unit(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Always returns the same value.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw(pub f64);

impl RandomSource for FixedDraw {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Returns queued draws in order.
///
/// Running out of draws is a bug in the caller, so it panics.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraws {
    draws: VecDeque<f64>,
}

impl ScriptedDraws {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedDraws {
    fn next_unit(&mut self) -> f64 {
        match self.draws.pop_front() {
            Some(draw) => draw,
            None => panic!("ScriptedDraws exhausted"),
        }
    }
}
