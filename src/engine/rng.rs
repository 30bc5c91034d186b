//! Deterministic random number generation.
//!
//! Random city layouts and the names handed to clicked cities both come
//! from a seeded PCG stream, so a seed fully reproduces a board.

use rand::prelude::*;
use rand_pcg::Pcg64;

use crate::error::{TourError, TourResult};

/// Seeded, reproducible random number generator.
#[derive(Debug, Clone)]
pub struct TourRng {
    /// Seed the stream was created from.
    seed: u64,
    /// Internal PCG state.
    rng: Pcg64,
}

impl TourRng {
    /// Create a new RNG from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg64::seed_from_u64(seed),
        }
    }

    /// Get the seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random f64 in [0, 1).
    pub fn gen_f64(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Generate a random f64 in `[min, max)`.
    ///
    /// # Errors
    ///
    /// Returns `TourError::Config` if either bound is not finite or
    /// `min > max`.
    pub fn gen_range_f64(&mut self, min: f64, max: f64) -> TourResult<f64> {
        if !(min.is_finite() && max.is_finite()) || min > max {
            return Err(TourError::config(format!(
                "random range [{min}, {max}) is empty or not finite"
            )));
        }
        Ok(min + (max - min) * self.gen_f64())
    }

    /// Pick an index in `[0, len)`, or `None` when `len` is zero.
    pub fn gen_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl Default for TourRng {
    fn default() -> Self {
        Self::new(42)
    }
}
