//! Flight references, keys and status codes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash::{self, Hash32};
use crate::{AccountId, SuretyError};

/// Deterministic identifier of a flight, derived from airline, flight number
/// and departure timestamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightKey(Hash32);

impl FlightKey {
    /// Borrow the underlying digest
    pub fn digest(&self) -> &Hash32 {
        &self.0
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlightKey({})", self.0)
    }
}

/// The (airline, flight number, timestamp) triple every flight-scoped
/// operation is addressed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlightRef {
    /// Operating airline
    pub airline: AccountId,
    /// Flight number, e.g. `AC110`
    pub flight: String,
    /// Scheduled departure
    pub timestamp: u64,
}

impl FlightRef {
    /// Build a reference from its parts
    pub fn new(airline: AccountId, flight: impl Into<String>, timestamp: u64) -> Self {
        Self {
            airline,
            flight: flight.into(),
            timestamp,
        }
    }

    /// Compute the flight key.
    pub fn key(&self) -> FlightKey {
        let mut h = hash::hasher();
        h.update(b"SURETY_FLIGHT_KEY");
        h.update(self.airline.as_bytes());
        h.update_prefixed(self.flight.as_bytes());
        h.update(self.timestamp.to_be_bytes());
        FlightKey(h.finalize())
    }
}

impl fmt::Display for FlightRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{} ({})", self.flight, self.timestamp, self.airline)
    }
}

/// Flight status codes as reported by oracles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum FlightStatus {
    /// No consensus yet
    #[default]
    Unknown = 0,
    /// Departed on time
    OnTime = 10,
    /// Delayed by the airline; the only status that pays out
    LateAirline = 20,
    /// Delayed by weather
    LateWeather = 30,
    /// Delayed by a technical fault
    LateTechnical = 40,
    /// Delayed for another reason
    LateOther = 50,
}

impl FlightStatus {
    /// Raw wire code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Only delays attributable to the airline pay out.
    pub fn qualifies_for_payout(self) -> bool {
        matches!(self, FlightStatus::LateAirline)
    }
}

impl TryFrom<u8> for FlightStatus {
    type Error = SuretyError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unknown),
            10 => Ok(Self::OnTime),
            20 => Ok(Self::LateAirline),
            30 => Ok(Self::LateWeather),
            40 => Ok(Self::LateTechnical),
            50 => Ok(Self::LateOther),
            _ => Err(SuretyError::InvalidStatusCode { code }),
        }
    }
}

impl From<FlightStatus> for u8 {
    fn from(status: FlightStatus) -> Self {
        status.code()
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::OnTime => "on-time",
            Self::LateAirline => "late-airline",
            Self::LateWeather => "late-weather",
            Self::LateTechnical => "late-technical",
            Self::LateOther => "late-other",
        };
        write!(f, "{name}({})", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_deterministic() {
        let airline = AccountId::derived("airline");
        let a = FlightRef::new(airline, "AC110", 1_591_878_209_161);
        let b = FlightRef::new(airline, "AC110", 1_591_878_209_161);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_key_depends_on_every_field() {
        let airline = AccountId::derived("airline");
        let base = FlightRef::new(airline, "AC110", 100);
        assert_ne!(base.key(), FlightRef::new(airline, "AC111", 100).key());
        assert_ne!(base.key(), FlightRef::new(airline, "AC110", 101).key());
        assert_ne!(
            base.key(),
            FlightRef::new(AccountId::derived("other"), "AC110", 100).key()
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(FlightStatus::try_from(20).unwrap(), FlightStatus::LateAirline);
        assert!(FlightStatus::LateAirline.qualifies_for_payout());
        assert!(!FlightStatus::LateWeather.qualifies_for_payout());
        assert_eq!(
            FlightStatus::try_from(21).unwrap_err(),
            SuretyError::InvalidStatusCode { code: 21 }
        );
    }
}
