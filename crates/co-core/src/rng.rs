//! Deterministic RNG for restart route selection.
//!
//! # Determinism strategy
//!
//! Every run gets its own `SmallRng` seeded by:
//!
//!   seed = experiment_seed XOR (run_number * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive run numbers across the seed space.  This means:
//!
//! - Re-running run N from the same latest snapshot reproduces the same
//!   restart assignments.
//! - Consecutive runs still draw different routes for freed slots.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded RNG used by the carryover planner for restart route choice.
pub struct RouteRng(SmallRng);

impl RouteRng {
    pub fn new(seed: u64) -> Self {
        RouteRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive the RNG for one run from the experiment seed.
    pub fn for_run(seed: u64, run_number: u32) -> Self {
        let mixed = seed ^ (run_number as u64).wrapping_mul(MIXING_CONSTANT);
        RouteRng(SmallRng::seed_from_u64(mixed))
    }

    /// Choose a random element from a slice.
    /// Returns `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}
