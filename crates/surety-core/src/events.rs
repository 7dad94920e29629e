//! Events published after committed operations.
//!
//! Off-chain oracle clients watch for [`SuretyEvent::OracleRequest`]; the
//! rest exist for front-ends and auditing. Events are only emitted for
//! operations that committed, never for rejected ones.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, FlightKey, FlightRef, FlightStatus};

/// Notification of a committed state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SuretyEvent {
    /// Stake deposited for an airline
    AirlineFunded {
        /// Funded airline
        airline: AccountId,
        /// This deposit
        amount: Amount,
        /// Cumulative stake after the deposit
        total: Amount,
    },
    /// Vote recorded for a candidate that has not reached the threshold yet
    AirlineVoteCast {
        /// Candidate airline
        candidate: AccountId,
        /// Voting airline
        voter: AccountId,
        /// Distinct votes so far
        votes: usize,
        /// Votes needed for admission
        required: usize,
    },
    /// Airline admitted to the registry
    AirlineRegistered {
        /// Admitted airline
        airline: AccountId,
        /// Airline whose call completed the admission
        by: AccountId,
    },
    /// Flight accepted for insurance
    FlightRegistered {
        /// Flight as registered
        flight: FlightRef,
        /// Derived flight key
        key: FlightKey,
    },
    /// Passenger bought a policy
    InsurancePurchased {
        /// Insured passenger
        passenger: AccountId,
        /// Insured flight
        key: FlightKey,
        /// Premium paid into the reserve
        premium: Amount,
    },
    /// Oracle registered with its assigned indexes
    OracleRegistered {
        /// Oracle identity
        oracle: AccountId,
        /// Assigned bucket indexes
        indexes: [u8; 3],
    },
    /// Dispatch to oracle clients assigned to `index`.
    OracleRequest {
        /// Bucket the request was routed to
        index: u8,
        /// Operating airline
        airline: AccountId,
        /// Flight number
        flight: String,
        /// Scheduled departure
        timestamp: u64,
    },
    /// Oracle report accepted
    OracleReport {
        /// Reporting oracle
        oracle: AccountId,
        /// Request bucket
        index: u8,
        /// Reported flight
        flight: FlightRef,
        /// Reported status
        status: FlightStatus,
        /// Reports now agreeing on `status`
        votes: usize,
    },
    /// Consensus reached for a status request.
    FlightStatusInfo {
        /// Settled flight
        flight: FlightRef,
        /// Agreed status
        status: FlightStatus,
    },
    /// A flight's policies were credited
    InsureesCredited {
        /// Credited flight
        key: FlightKey,
        /// Policies credited
        policies: usize,
        /// Sum of all credits
        total: Amount,
    },
    /// Credit withdrawn and transferred
    PayoutSent {
        /// Paid passenger
        passenger: AccountId,
        /// Flight the credit was for
        key: FlightKey,
        /// Transferred amount
        amount: Amount,
    },
    /// Privileged capability re-issued; earlier tokens are revoked
    AuthorizedCallerChanged {
        /// New capability holder
        caller: AccountId,
    },
    /// Pause switch toggled
    OperationalChanged {
        /// Whether mutations are accepted
        operational: bool,
    },
}
