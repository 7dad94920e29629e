//! Oracle consensus coordinator
//!
//! Owns the oracle table and every status request, and routes responses
//! through the pure transitions in [`crate::core`]. Fee collection and event
//! publication are left to the caller; this type only decides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use surety_core::{
    AccountId, Amount, FlightDirectory, FlightRef, FlightStatus, RandomEffects, Result,
    SuretyConfig, SuretyError,
};
use tracing::{debug, info};

use crate::core::state::{Quorum, RequestId, StatusRequest};
use crate::core::transitions::{apply_response, open_request};
use crate::indexes::{assign_indexes, derive_request_index, OracleIndexes};

/// A registered oracle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRecord {
    /// Oracle identity
    pub oracle: AccountId,
    /// Indexes assigned at registration
    pub indexes: OracleIndexes,
}

/// What an accepted response did to its request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Vote counted, request still open
    Recorded {
        /// Reports agreeing on the submitted status
        votes: usize,
    },
    /// This response completed the quorum
    Finalized {
        /// Agreed status
        status: FlightStatus,
    },
}

/// Oracle table and status requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConsensus {
    oracles: BTreeMap<AccountId, OracleRecord>,
    requests: BTreeMap<RequestId, StatusRequest>,
    nonce: u64,
    registration_fee: Amount,
    index_space: u8,
    quorum: Quorum,
}

impl OracleConsensus {
    /// Empty table; fails on a zero quorum.
    pub fn new(config: &SuretyConfig) -> Result<Self> {
        let quorum = Quorum::new(config.min_responses)
            .ok_or_else(|| SuretyError::config("min_responses must be >= 1"))?;
        Ok(Self {
            oracles: BTreeMap::new(),
            requests: BTreeMap::new(),
            nonce: 0,
            registration_fee: config.oracle_registration_fee,
            index_space: config.oracle_index_space,
            quorum,
        })
    }

    /// Register `oracle` against `fee` and assign its indexes.
    pub fn register_oracle(
        &mut self,
        oracle: AccountId,
        fee: Amount,
        rng: &dyn RandomEffects,
    ) -> Result<OracleIndexes> {
        if fee < self.registration_fee {
            return Err(SuretyError::InsufficientFee {
                required: self.registration_fee,
                provided: fee,
            });
        }
        if self.oracles.contains_key(&oracle) {
            return Err(SuretyError::OracleAlreadyRegistered { oracle });
        }

        let indexes = assign_indexes(rng, self.index_space);
        self.oracles
            .insert(oracle, OracleRecord { oracle, indexes });
        info!(oracle = %oracle, indexes = %indexes, "Oracle registered");
        Ok(indexes)
    }

    /// Indexes assigned to `oracle`.
    pub fn get_my_indexes(&self, oracle: &AccountId) -> Result<OracleIndexes> {
        self.oracles
            .get(oracle)
            .map(|record| record.indexes)
            .ok_or(SuretyError::UnknownOracle { oracle: *oracle })
    }

    /// Open a status request for a registered flight.
    ///
    /// If an open request already exists at the derived id it is kept with
    /// its votes; a finalized one is replaced by a fresh round.
    pub fn fetch_flight_status(
        &mut self,
        flights: &impl FlightDirectory,
        flight: FlightRef,
        requester: AccountId,
    ) -> Result<RequestId> {
        let key = flight.key();
        if !flights.is_flight_registered(&key) {
            return Err(SuretyError::UnknownFlight { key });
        }

        let index = derive_request_index(&flight, self.nonce, self.index_space);
        self.nonce = self.nonce.wrapping_add(1);
        let id = RequestId { index, key };

        match self.requests.get(&id) {
            Some(existing) if existing.is_open() => {
                debug!(request = %id, "Status request already open");
            }
            _ => {
                info!(request = %id, flight = %flight, requester = %requester, "Status request opened");
                self.requests
                    .insert(id, open_request(id, flight, requester, self.quorum));
            }
        }
        Ok(id)
    }

    /// Record an oracle's report.
    pub fn submit_oracle_response(
        &mut self,
        oracle: AccountId,
        index: u8,
        flight: &FlightRef,
        status: FlightStatus,
    ) -> Result<ResponseOutcome> {
        if !self.get_my_indexes(&oracle)?.contains(index) {
            return Err(SuretyError::NotAssigned { oracle, index });
        }

        let id = RequestId {
            index,
            key: flight.key(),
        };
        let current = self.requests.get(&id).ok_or_else(|| SuretyError::UnknownRequest {
            request: id.to_string(),
        })?;

        let next = apply_response(current, oracle, status).into_result()?;
        let outcome = match next.outcome() {
            Some(status) => {
                info!(request = %id, status = %status, "Status request finalized");
                ResponseOutcome::Finalized { status }
            }
            None => {
                let votes = next.votes_for(status);
                debug!(request = %id, oracle = %oracle, status = %status, votes, "Oracle response recorded");
                ResponseOutcome::Recorded { votes }
            }
        };
        self.requests.insert(id, next);
        Ok(outcome)
    }

    /// Request by id, open or finalized
    pub fn request(&self, id: &RequestId) -> Option<&StatusRequest> {
        self.requests.get(id)
    }

    /// Requests still short of quorum
    pub fn open_requests(&self) -> impl Iterator<Item = &StatusRequest> {
        self.requests.values().filter(|r| r.is_open())
    }

    /// Registered oracles
    pub fn oracle_count(&self) -> usize {
        self.oracles.len()
    }

    /// Oracles holding `index`.
    pub fn oracles_for_index(&self, index: u8) -> Vec<AccountId> {
        self.oracles
            .values()
            .filter(|r| r.indexes.contains(index))
            .map(|r| r.oracle)
            .collect()
    }

    /// Fee required to register
    pub fn registration_fee(&self) -> Amount {
        self.registration_fee
    }
}
