//! Unified error system for Surety
//!
//! Every component returns `SuretyError`. Variants name the concrete failure an
//! operation hit; `ErrorKind` groups them into the coarse taxonomy callers
//! branch on (oracle bots retrying, a UI rendering a reason).
//!
//! Failures are always synchronous and never leave partial state behind: the
//! caller that receives an error can assume nothing changed.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, FlightKey, FlightStatus};

/// Coarse failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller lacks the required role, funding, registration or capability
    Unauthorized,
    /// Funding, premium, fee or reserve outside accepted bounds
    InvalidAmount,
    /// Re-registration, duplicate vote, duplicate policy or duplicate response
    DuplicateEntry,
    /// Unknown flight, request, oracle or index assignment
    NotFound,
    /// Response submitted to a finalized status request
    RequestClosed,
    /// Payout requested without a credited balance
    NotInsured,
    /// Malformed input or configuration
    Invalid,
    /// Failure outside the bookkeeping itself (transfer, overflow)
    Internal,
}

/// Unified error type for all Surety operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum SuretyError {
    /// Airline funding below the minimum stake
    #[error("Minimal funding required is {minimum}, got {provided}")]
    InsufficientFunds {
        /// Required minimum
        minimum: Amount,
        /// Amount offered
        provided: Amount,
    },

    /// Premium is zero or above the cap
    #[error("Insurance price must be greater than 0 and at most {maximum}, got {provided}")]
    InvalidPremium {
        /// Premium cap
        maximum: Amount,
        /// Amount offered
        provided: Amount,
    },

    /// Oracle registration fee below the fixed amount
    #[error("Registration fee is required: {required}, got {provided}")]
    InsufficientFee {
        /// Fixed registration fee
        required: Amount,
        /// Amount offered
        provided: Amount,
    },

    /// Escrow reserve cannot cover a payout
    #[error("Escrow reserve {available} cannot cover payout of {requested}")]
    InsufficientReserve {
        /// Reserve on hand
        available: Amount,
        /// Payout requested
        requested: Amount,
    },

    /// Caller lacks the required role or capability
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// What was missing
        message: String,
    },

    /// Airline is already a registered member
    #[error("Airline {airline} is already registered")]
    AlreadyRegistered {
        /// Candidate airline
        airline: AccountId,
    },

    /// Oracle is already registered
    #[error("Oracle {oracle} is already registered")]
    OracleAlreadyRegistered {
        /// Oracle identity
        oracle: AccountId,
    },

    /// Voter already voted for this candidate
    #[error("Airline {voter} already voted for {candidate}")]
    DuplicateVote {
        /// Candidate airline
        candidate: AccountId,
        /// Voting airline
        voter: AccountId,
    },

    /// Flight key already registered
    #[error("Flight {key} is already registered")]
    DuplicateFlight {
        /// Flight key
        key: FlightKey,
    },

    /// Passenger already holds a policy for this flight
    #[error("Passenger {passenger} is already insured for flight {key}")]
    DuplicatePolicy {
        /// Passenger identity
        passenger: AccountId,
        /// Flight key
        key: FlightKey,
    },

    /// Oracle already responded to this request
    #[error("Oracle {oracle} already responded to request {request}")]
    DuplicateResponse {
        /// Oracle identity
        oracle: AccountId,
        /// Request description
        request: String,
    },

    /// Flight is not registered
    #[error("Flight is not registered: {key}")]
    UnknownFlight {
        /// Flight key
        key: FlightKey,
    },

    /// Oracle is not registered
    #[error("Not registered as an oracle: {oracle}")]
    UnknownOracle {
        /// Oracle identity
        oracle: AccountId,
    },

    /// No status request matches the response
    #[error("Flight or timestamp do not match oracle request: {request}")]
    UnknownRequest {
        /// Request description
        request: String,
    },

    /// Request index is not among the oracle's assigned indexes
    #[error("Index {index} does not match oracle {oracle} assignment")]
    NotAssigned {
        /// Oracle identity
        oracle: AccountId,
        /// Request index
        index: u8,
    },

    /// Response arrived after the request was finalized
    #[error("Request {request} is already finalized")]
    RequestClosed {
        /// Request description
        request: String,
    },

    /// Payout requested without a credited balance
    #[error("Passenger not insured: {passenger} has no credit for flight {key}")]
    NotInsured {
        /// Passenger identity
        passenger: AccountId,
        /// Flight key
        key: FlightKey,
    },

    /// Insurance requested for a flight that already departed
    #[error("Flight {key} departed at {departure}, now {now}")]
    FlightDeparted {
        /// Flight key
        key: FlightKey,
        /// Scheduled departure
        departure: u64,
        /// Current time
        now: u64,
    },

    /// Insurance requested for a flight whose status is already settled
    #[error("Flight {key} is already settled as {status}")]
    FlightSettled {
        /// Flight key
        key: FlightKey,
        /// Consensus status
        status: FlightStatus,
    },

    /// Raw status code is not a known flight status
    #[error("Unknown flight status code {code}")]
    InvalidStatusCode {
        /// Raw code
        code: u8,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Value transfer failed
    #[error("Transfer of {amount} to {to} failed: {message}")]
    Transfer {
        /// Recipient
        to: AccountId,
        /// Amount attempted
        amount: Amount,
        /// Handler message
        message: String,
    },

    /// Checked arithmetic overflowed
    #[error("Arithmetic overflow: {message}")]
    Overflow {
        /// Operation that overflowed
        message: String,
    },
}

impl SuretyError {
    /// Map onto the coarse failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InsufficientFunds { .. }
            | Self::InvalidPremium { .. }
            | Self::InsufficientFee { .. }
            | Self::InsufficientReserve { .. } => ErrorKind::InvalidAmount,
            Self::AlreadyRegistered { .. }
            | Self::OracleAlreadyRegistered { .. }
            | Self::DuplicateVote { .. }
            | Self::DuplicateFlight { .. }
            | Self::DuplicatePolicy { .. }
            | Self::DuplicateResponse { .. } => ErrorKind::DuplicateEntry,
            Self::UnknownFlight { .. }
            | Self::UnknownOracle { .. }
            | Self::UnknownRequest { .. }
            | Self::NotAssigned { .. } => ErrorKind::NotFound,
            Self::RequestClosed { .. } => ErrorKind::RequestClosed,
            Self::NotInsured { .. } => ErrorKind::NotInsured,
            Self::FlightDeparted { .. }
            | Self::FlightSettled { .. }
            | Self::InvalidStatusCode { .. }
            | Self::Config { .. } => ErrorKind::Invalid,
            Self::Transfer { .. } | Self::Overflow { .. } => ErrorKind::Internal,
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an overflow error
    pub fn overflow(message: impl Into<String>) -> Self {
        Self::Overflow {
            message: message.into(),
        }
    }
}

/// Standard Result type for Surety operations
pub type Result<T> = std::result::Result<T, SuretyError>;

impl From<std::io::Error> for SuretyError {
    fn from(err: std::io::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<toml::de::Error> for SuretyError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}
