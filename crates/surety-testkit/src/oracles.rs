//! Oracle client stand-in.
//!
//! Registers a pool of oracles and answers status requests the way the
//! off-chain oracle clients do: every oracle holding the request's index
//! reports, and rejections are expected once consensus closes the request.

use std::collections::BTreeMap;

use surety_app::{FlightSurety, OracleIndexes, ResponseOutcome};
use surety_core::{AccountId, Amount, FlightRef, FlightStatus, Result};

use crate::accounts::oracle;

/// Registered oracles and their indexes
pub struct OraclePool {
    oracles: BTreeMap<AccountId, OracleIndexes>,
}

impl OraclePool {
    /// Register `count` oracles, paying `fee` each.
    pub fn register(surety: &FlightSurety, count: usize, fee: Amount) -> Self {
        let oracles = (0..count)
            .map(|n| {
                let id = oracle(n);
                let indexes = surety.register_oracle(id, fee).unwrap();
                (id, indexes)
            })
            .collect();
        Self { oracles }
    }

    /// Register further oracles until at least `min` hold `index`.
    pub fn ensure_assigned(&mut self, surety: &FlightSurety, index: u8, min: usize, fee: Amount) {
        let mut serial = self.oracles.len();
        while self.assigned(index).len() < min {
            let id = oracle(serial);
            let indexes = surety.register_oracle(id, fee).unwrap();
            self.oracles.insert(id, indexes);
            serial += 1;
        }
    }

    /// Oracles in the pool
    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }

    /// Indexes of a pool member
    pub fn indexes(&self, oracle: &AccountId) -> Option<OracleIndexes> {
        self.oracles.get(oracle).copied()
    }

    /// Oracles assigned to `index`.
    pub fn assigned(&self, index: u8) -> Vec<AccountId> {
        self.oracles
            .iter()
            .filter(|(_, indexes)| indexes.contains(index))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Every oracle that may not answer `index`.
    pub fn unassigned(&self, index: u8) -> Vec<AccountId> {
        self.oracles
            .iter()
            .filter(|(_, indexes)| !indexes.contains(index))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Every oracle in the pool reports `status` for `index`, assigned or
    /// not. Returns each oracle's result.
    pub fn broadcast(
        &self,
        surety: &FlightSurety,
        index: u8,
        flight: &FlightRef,
        status: FlightStatus,
    ) -> Vec<(AccountId, Result<ResponseOutcome>)> {
        self.oracles
            .keys()
            .map(|id| {
                (
                    *id,
                    surety.submit_oracle_response(*id, index, flight, status),
                )
            })
            .collect()
    }

    /// The assigned oracles report `status` until the request finalizes.
    /// Returns the number of accepted reports, or `None` if the pool holds
    /// too few oracles on `index` to reach consensus.
    pub fn settle(
        &self,
        surety: &FlightSurety,
        index: u8,
        flight: &FlightRef,
        status: FlightStatus,
    ) -> Option<usize> {
        let mut accepted = 0;
        for id in self.assigned(index) {
            match surety.submit_oracle_response(id, index, flight, status) {
                Ok(ResponseOutcome::Finalized { .. }) => return Some(accepted + 1),
                Ok(ResponseOutcome::Recorded { .. }) => accepted += 1,
                Err(_) => {}
            }
        }
        None
    }
}
