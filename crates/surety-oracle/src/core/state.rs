//! Status Request State
//!
//! Effect-free structures for a single status request.
//!
//! A request is identified by the bucket index it was routed to together with
//! the flight key, i.e. by (index, airline, flight number, timestamp). Several
//! requests may be open at once for different flights, or for the same flight
//! routed to different indexes.

// BTree collections keep iteration deterministic so that replaying the same
// responses always yields the same state.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use surety_core::{AccountId, FlightKey, FlightRef, FlightStatus};

/// Matching reports required to finalize. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quorum(NonZeroUsize);

impl Quorum {
    /// `None` for zero
    pub fn new(value: usize) -> Option<Self> {
        NonZeroUsize::new(value).map(Self)
    }

    /// Required matching reports
    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Identity of a status request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId {
    /// Bucket the request was routed to
    pub index: u8,
    /// Requested flight
    pub key: FlightKey,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.key, self.index)
    }
}

/// Request lifecycle: `Open → Finalized`. No other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestPhase {
    /// Accepting responses
    Open,
    /// Quorum reached on `status`. Terminal.
    Finalized {
        /// Agreed status
        status: FlightStatus,
    },
}

/// One status request and the reports collected for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRequest {
    /// Request identity
    pub id: RequestId,
    /// Requested flight
    pub flight: FlightRef,
    /// Account that triggered the fetch
    pub requester: AccountId,
    /// Status code -> oracles that reported it
    pub responses: BTreeMap<FlightStatus, BTreeSet<AccountId>>,
    /// Lifecycle phase
    pub phase: RequestPhase,
    /// Matching reports needed to finalize
    pub quorum: Quorum,
}

impl StatusRequest {
    /// Still accepting responses
    pub fn is_open(&self) -> bool {
        matches!(self.phase, RequestPhase::Open)
    }

    /// Finalized status, if any
    pub fn outcome(&self) -> Option<FlightStatus> {
        match self.phase {
            RequestPhase::Finalized { status } => Some(status),
            RequestPhase::Open => None,
        }
    }

    /// Whether `oracle` has reported any status for this request.
    pub fn has_responded(&self, oracle: &AccountId) -> bool {
        self.responses.values().any(|voters| voters.contains(oracle))
    }

    /// Reports agreeing on `status`
    pub fn votes_for(&self, status: FlightStatus) -> usize {
        self.responses.get(&status).map_or(0, BTreeSet::len)
    }

    /// Reports of any status
    pub fn total_responses(&self) -> usize {
        self.responses.values().map(BTreeSet::len).sum()
    }
}
