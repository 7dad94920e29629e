//! Read-only views components expose to each other.
//!
//! The flight ledger needs to know whether an airline may register flights,
//! and the oracle subsystem needs to know whether a flight exists. Both ask
//! through these traits instead of depending on the owning component.

use crate::{AccountId, FlightKey};

/// Airline membership as seen by other components
pub trait AirlineDirectory {
    /// Admitted to the registry
    fn is_airline_registered(&self, airline: &AccountId) -> bool;
    /// Has paid at least the minimum stake
    fn is_airline_funded(&self, airline: &AccountId) -> bool;

    /// Registered and funded: the bar for voting and registering flights.
    fn is_airline_active(&self, airline: &AccountId) -> bool {
        self.is_airline_registered(airline) && self.is_airline_funded(airline)
    }
}

/// Flight existence as seen by other components
pub trait FlightDirectory {
    /// Registered by its airline
    fn is_flight_registered(&self, key: &FlightKey) -> bool;
}
