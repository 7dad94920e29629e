//! Entropy for oracle index assignment.
//!
//! Oracles must not be able to predict or bias the indexes they are assigned,
//! otherwise a single operator could concentrate its identities on one bucket
//! and control consensus for every request routed there. The production
//! handler therefore draws from the operating system CSPRNG.

use rand::rngs::OsRng;
use rand::Rng;

/// Source of uniformly distributed indexes
pub trait RandomEffects: Send + Sync {
    /// Uniform value in `0..bound`. `bound` is never zero.
    fn random_index(&self, bound: u8) -> u8;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomEffects for OsRandom {
    fn random_index(&self, bound: u8) -> u8 {
        OsRng.gen_range(0..bound)
    }
}
