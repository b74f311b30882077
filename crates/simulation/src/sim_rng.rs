//! Deterministic simulation RNG.
//!
//! Wraps `ChaCha8Rng` for cross-platform deterministic randomness. Every
//! stochastic draw in a run goes through one `SimRng` seeded from the run's
//! `u64` seed, so identical seeds produce identical weather.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

/// Deterministic RNG for all simulation randomness.
///
/// Callers use `rng.0` (a `ChaCha8Rng` implementing `rand::Rng`).
#[derive(Debug, Clone)]
pub struct SimRng(pub ChaCha8Rng);

impl Default for SimRng {
    fn default() -> Self {
        Self(ChaCha8Rng::seed_from_u64(DEFAULT_SEED))
    }
}

impl SimRng {
    /// Create a new `SimRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Resolve an optional caller seed, drawing one from entropy when absent.
///
/// The drawn seed is returned so an unseeded run can be replayed.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
