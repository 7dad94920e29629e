//! Oracle index assignment and request routing.
//!
//! Registration draws three distinct indexes through [`RandomEffects`]; the
//! security of the scheme rests on oracles being unable to predict or bias
//! that draw. Request routing is deterministic instead: the bucket for a
//! fetch is derived from the flight key and a nonce that advances on every
//! fetch, so repeated fetches for one flight spread across buckets.

use serde::{Deserialize, Serialize};
use std::fmt;
use surety_core::config::INDEXES_PER_ORACLE;
use surety_core::{hash, FlightRef, RandomEffects};

/// The indexes assigned to one oracle. Immutable after registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OracleIndexes([u8; INDEXES_PER_ORACLE]);

impl OracleIndexes {
    /// Wrap already-drawn indexes
    pub fn new(indexes: [u8; INDEXES_PER_ORACLE]) -> Self {
        Self(indexes)
    }

    /// Whether `index` is one of the assigned indexes
    pub fn contains(&self, index: u8) -> bool {
        self.0.contains(&index)
    }

    /// The indexes in draw order
    pub fn as_array(&self) -> [u8; INDEXES_PER_ORACLE] {
        self.0
    }
}

impl fmt::Display for OracleIndexes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "[{a}, {b}, {c}]")
    }
}

/// Draw distinct indexes from `0..space` without replacement.
///
/// `space` must be at least [`INDEXES_PER_ORACLE`]; configuration validation
/// enforces this.
pub fn assign_indexes(rng: &dyn RandomEffects, space: u8) -> OracleIndexes {
    let mut pool: Vec<u8> = (0..space).collect();
    let mut picked = [0u8; INDEXES_PER_ORACLE];
    for slot in picked.iter_mut() {
        let remaining = u8::try_from(pool.len()).unwrap_or(u8::MAX);
        let choice = usize::from(rng.random_index(remaining)) % pool.len();
        *slot = pool.swap_remove(choice);
    }
    OracleIndexes(picked)
}

/// Bucket a status request is routed to.
pub fn derive_request_index(flight: &FlightRef, nonce: u64, space: u8) -> u8 {
    let mut h = hash::hasher();
    h.update(b"SURETY_REQUEST_INDEX");
    h.update(flight.key().digest().as_bytes());
    h.update(nonce.to_be_bytes());
    let digest = h.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    (u64::from_be_bytes(head) % u64::from(space)) as u8
}
