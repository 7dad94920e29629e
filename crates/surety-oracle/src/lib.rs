//! # Surety Oracle - Flight Status Consensus
//!
//! Decentralised flight-status reporting by a pool of paid oracles.
//!
//! ## Architecture
//!
//! - **indexes**: Index assignment at registration and request-index derivation
//! - **core**: Effect-free request state and transitions (`Open → Finalized`)
//! - **consensus**: Registry of oracles and open requests; routes responses
//!   through the pure transitions
//!
//! ## Protocol
//!
//! 1. An oracle pays the registration fee and is assigned three distinct
//!    indexes from `0..oracle_index_space`.
//! 2. Anyone may request a status for a registered flight. The request is
//!    routed to a bucket index derived from the flight and a per-request
//!    nonce, and a dispatch event tells oracle clients which bucket is asked.
//! 3. Oracles holding that index report a status code. The first code to
//!    collect `min_responses` distinct reports finalizes the request.
//! 4. Responses to a finalized request are rejected with `RequestClosed`.
//!
//! Requests that never reach quorum stay open; there is no expiry.

pub mod consensus;
pub mod core;
pub mod indexes;

pub use consensus::{OracleConsensus, OracleRecord, ResponseOutcome};
pub use crate::core::state::{Quorum, RequestId, RequestPhase, StatusRequest};
pub use indexes::OracleIndexes;
