//! Surety Core - Foundation Types
//!
//! This crate provides the foundational types and effect interfaces shared by
//! every Surety component. It contains no component state of its own.
//!
//! # Contents
//!
//! ## Domain Types
//! - `AccountId`: Caller identity as authenticated by the ledger runtime
//! - `Amount`: Value in the smallest indivisible unit (wei); never fractional
//! - `FlightRef` / `FlightKey`: Flight triple and its deterministic key
//! - `FlightStatus`: Status codes reported by oracles
//!
//! ## Cross-Cutting Concerns
//! - `SuretyError` / `ErrorKind`: Unified error type and failure taxonomy
//! - `SuretyConfig`: TOML + environment configuration
//! - `AccessControl` / `AuthorizedCaller`: Owner-issued capability for privileged calls
//! - `SuretyEvent`: Events observed by off-chain clients
//!
//! ## Effect Interfaces
//! - `RandomEffects`: Oracle index assignment entropy
//! - `ValueTransferEffects`: Outbound value movement (escrow payouts)
//! - `PhysicalTimeEffects`: Wall-clock time for the departure guard

#![forbid(unsafe_code)]

/// Money in the ledger's smallest unit
pub mod amount;

/// Owner-issued capabilities for privileged mutations
pub mod capability;

/// Configuration loading and validation
pub mod config;

/// Effect interfaces and production handlers
pub mod effects;

/// Unified error handling
pub mod errors;

/// Events published after committed operations
pub mod events;

/// Flight references, keys and status codes
pub mod flight;

/// Content hashing (SHA-256)
pub mod hash;

/// Account identifiers
pub mod identifiers;

/// Read-only views components expose to each other
pub mod directory;

pub use amount::Amount;
pub use capability::{AccessControl, AuthorizedCaller};
pub use config::SuretyConfig;
pub use directory::{AirlineDirectory, FlightDirectory};
pub use effects::{
    OsRandom, PhysicalTimeEffects, RandomEffects, SystemClock, ValueTransferEffects,
};
pub use errors::{ErrorKind, Result, SuretyError};
pub use events::SuretyEvent;
pub use flight::{FlightKey, FlightRef, FlightStatus};
pub use hash::Hash32;
pub use identifiers::AccountId;
