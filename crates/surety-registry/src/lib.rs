//! # Surety Registry - Airline Membership
//!
//! Membership table and voting state machine for admitting airlines.
//!
//! ## Admission policy
//!
//! - The genesis airline is registered at construction (unfunded).
//! - Only *active* airlines (registered and funded) may nominate or vote.
//! - While fewer than `multiparty_threshold` airlines are registered, a
//!   nomination registers the candidate immediately.
//! - From then on each nomination is a vote; the candidate is admitted once
//!   distinct votes reach `ceil(registered / 2)`, evaluated at vote time.
//!
//! ## State per airline
//!
//! Each known account is either `Pending` (with the set of airlines that voted
//! for it, possibly empty when it has only deposited funds) or `Registered`.
//! Admission replaces the pending vote set with `Registered`, so stale votes
//! cannot linger. Registration is permanent.

mod registry;

pub use registry::{AirlineRecord, AirlineRegistry, Membership, RegistrationOutcome};
