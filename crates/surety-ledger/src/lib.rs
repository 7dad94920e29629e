//! # Surety Ledger - Flights, Insurance and Escrow
//!
//! Bookkeeping for registered flights, the policies passengers buy against
//! them, and the credits owed after a qualifying delay.
//!
//! ## Privileged mutations
//!
//! Setting a flight's status, crediting insurees and releasing escrowed
//! credit require an [`AuthorizedCaller`](surety_core::AuthorizedCaller)
//! issued by the owner through the ledger's [`AccessControl`](surety_core::AccessControl).
//!
//! ## Pull payments
//!
//! Credits are never pushed to passengers. [`FlightLedger::release`] zeroes
//! the credit and returns a [`Payout`] describing the transfer still to be
//! made; the caller commits the ledger state first and only then moves value.

mod escrow;
mod ledger;

pub use escrow::{Escrow, Payout};
pub use ledger::{CreditSummary, Flight, FlightLedger, InsurancePolicy};
