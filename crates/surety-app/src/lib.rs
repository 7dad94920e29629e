//! Surety App - FlightSurety Facade
//!
//! Composes the airline registry, the flight ledger with its escrow, and
//! oracle consensus behind a single [`FlightSurety`] handle.
//!
//! # Execution model
//!
//! Every public mutation runs against a private copy of [`SuretyState`] and is
//! committed only if it succeeds, so a rejected call never leaves partial
//! state behind. Calls are serialized by one lock. Events are published on a
//! broadcast channel while that lock is still held, so subscribers see them in
//! commit order.
//!
//! Escrow payouts are the only operation that reaches outside the state: the
//! credit is zeroed and committed, the lock is released, and only then is the
//! value transfer performed. A payee that re-enters [`FlightSurety::pay`]
//! while being paid therefore observes an empty balance.

#![forbid(unsafe_code)]

mod effects;
mod state;
mod surety;

pub use effects::SuretyEffects;
pub use state::SuretyState;
pub use surety::{FlightSurety, APP_ACCOUNT_LABEL};

pub use surety_ledger::CreditSummary;
pub use surety_oracle::{OracleIndexes, RequestId, ResponseOutcome, StatusRequest};
pub use surety_registry::RegistrationOutcome;
