use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use surety_core::{
    AccessControl, AccountId, AirlineDirectory, Amount, AuthorizedCaller, FlightDirectory,
    FlightKey, FlightRef, FlightStatus, Result, SuretyConfig, SuretyError,
};
use tracing::{debug, info, warn};

use crate::escrow::{Escrow, Payout};

/// A registered flight and its settlement state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Flight as registered
    pub flight: FlightRef,
    /// Derived key
    pub key: FlightKey,
    /// Consensus status; `Unknown` until oracles agree
    pub status: FlightStatus,
    /// Set once insurees have been credited; guards against double crediting.
    pub credited: bool,
}

/// One passenger's cover on one flight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePolicy {
    /// Insured passenger
    pub passenger: AccountId,
    /// Insured flight
    pub key: FlightKey,
    /// Amount paid for the cover
    pub premium: Amount,
    /// Unset until the flight's insurees are credited
    pub payout_percentage: Option<u16>,
}

/// Result of crediting a flight's insurees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditSummary {
    /// Credited flight
    pub key: FlightKey,
    /// Policies credited by this call
    pub policies: usize,
    /// Sum credited by this call
    pub total: Amount,
    /// The flight had already been credited; nothing changed.
    pub already_credited: bool,
}

/// Flights, policies and the escrow backing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightLedger {
    access: AccessControl,
    flights: BTreeMap<FlightKey, Flight>,
    policies: BTreeMap<FlightKey, BTreeMap<AccountId, InsurancePolicy>>,
    escrow: Escrow,
    max_premium: Amount,
    reject_departed: bool,
}

impl FlightLedger {
    /// Empty ledger owned by `owner`.
    pub fn new(config: &SuretyConfig, owner: AccountId) -> Self {
        Self {
            access: AccessControl::new(owner),
            flights: BTreeMap::new(),
            policies: BTreeMap::new(),
            escrow: Escrow::default(),
            max_premium: config.max_premium,
            reject_departed: config.reject_departed_flights,
        }
    }

    /// Owner, capability and pause state
    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    /// Owner-only: issue the capability for privileged mutations.
    pub fn authorize(&mut self, by: &AccountId, caller: AccountId) -> Result<AuthorizedCaller> {
        self.access.authorize(by, caller)
    }

    /// Owner-only: pause or resume.
    pub fn set_operational(&mut self, by: &AccountId, operational: bool) -> Result<()> {
        self.access.set_operational(by, operational)
    }

    fn lookup(&self, key: &FlightKey) -> Result<&Flight> {
        self.flights
            .get(key)
            .ok_or(SuretyError::UnknownFlight { key: *key })
    }

    /// Register a flight. `by` must be the airline itself, registered and funded.
    pub fn register_flight(
        &mut self,
        airlines: &impl AirlineDirectory,
        flight: FlightRef,
        by: AccountId,
    ) -> Result<FlightKey> {
        if by != flight.airline {
            return Err(SuretyError::unauthorized(format!(
                "caller {by} cannot register flights for airline {}",
                flight.airline
            )));
        }
        if !airlines.is_airline_active(&by) {
            return Err(SuretyError::unauthorized(format!(
                "airline {by} must be registered and funded to register flights"
            )));
        }
        let key = flight.key();
        if self.flights.contains_key(&key) {
            return Err(SuretyError::DuplicateFlight { key });
        }

        info!(flight = %flight, flight_key = %key, "Flight registered");
        self.flights.insert(
            key,
            Flight {
                flight,
                key,
                status: FlightStatus::Unknown,
                credited: false,
            },
        );
        Ok(key)
    }

    /// Buy insurance. The premium is the whole of `value`; anything above
    /// `max_premium` is refused rather than partially refunded.
    ///
    /// Flights whose status is settled or whose insurees were already
    /// credited no longer accept policies.
    pub fn buy(
        &mut self,
        flight: &FlightRef,
        passenger: AccountId,
        value: Amount,
        now: u64,
    ) -> Result<InsurancePolicy> {
        let key = flight.key();
        let entry = self.lookup(&key)?;
        if entry.credited || entry.status != FlightStatus::Unknown {
            return Err(SuretyError::FlightSettled {
                key,
                status: entry.status,
            });
        }
        if value.is_zero() || value > self.max_premium {
            return Err(SuretyError::InvalidPremium {
                maximum: self.max_premium,
                provided: value,
            });
        }
        if self.reject_departed && flight.timestamp <= now {
            return Err(SuretyError::FlightDeparted {
                key,
                departure: flight.timestamp,
                now,
            });
        }
        if self.is_passenger_insured(&passenger, &key) {
            return Err(SuretyError::DuplicatePolicy { passenger, key });
        }

        self.escrow.deposit(value)?;
        let policy = InsurancePolicy {
            passenger,
            key,
            premium: value,
            payout_percentage: None,
        };
        self.policies
            .entry(key)
            .or_default()
            .insert(passenger, policy.clone());
        info!(passenger = %passenger, flight_key = %key, premium = %value, "Insurance purchased");
        Ok(policy)
    }

    /// Record the consensus status of a flight. Privileged.
    pub fn set_status(
        &mut self,
        caller: &AuthorizedCaller,
        key: &FlightKey,
        status: FlightStatus,
    ) -> Result<()> {
        self.access.verify(caller)?;
        let flight = self
            .flights
            .get_mut(key)
            .ok_or(SuretyError::UnknownFlight { key: *key })?;
        flight.status = status;
        debug!(flight_key = %key, status = %status, "Flight status updated");
        Ok(())
    }

    /// Credit every policy on the flight with `premium * percentage / 100`.
    /// Privileged. A flight is credited at most once; later calls are no-ops.
    pub fn credit_insurees(
        &mut self,
        caller: &AuthorizedCaller,
        flight: &FlightRef,
        payout_percentage: u16,
    ) -> Result<CreditSummary> {
        self.access.verify(caller)?;
        let key = flight.key();
        if self.lookup(&key)?.credited {
            warn!(flight_key = %key, "Insurees already credited for flight");
            return Ok(CreditSummary {
                key,
                policies: 0,
                total: Amount::ZERO,
                already_credited: true,
            });
        }

        let mut credits = Vec::new();
        let mut total = Amount::ZERO;
        for policy in self.policies.get(&key).into_iter().flat_map(BTreeMap::values) {
            let amount = policy.premium.percent(payout_percentage)?;
            total = total.checked_add(amount)?;
            credits.push((policy.passenger, amount));
        }

        for (passenger, amount) in &credits {
            self.escrow.credit(*passenger, key, *amount)?;
        }
        if let Some(policies) = self.policies.get_mut(&key) {
            for policy in policies.values_mut() {
                policy.payout_percentage = Some(payout_percentage);
            }
        }
        if let Some(entry) = self.flights.get_mut(&key) {
            entry.credited = true;
        }

        info!(
            flight_key = %key,
            policies = credits.len(),
            total = %total,
            payout_percentage,
            "Insurees credited"
        );
        Ok(CreditSummary {
            key,
            policies: credits.len(),
            total,
            already_credited: false,
        })
    }

    /// Release a passenger's credit for a flight. Privileged.
    ///
    /// The credit is zeroed here; the caller performs the transfer only after
    /// this state is committed.
    pub fn release(
        &mut self,
        caller: &AuthorizedCaller,
        flight: &FlightRef,
        passenger: AccountId,
    ) -> Result<Payout> {
        self.access.verify(caller)?;
        self.escrow.release(passenger, flight.key())
    }

    /// Reinstate a payout whose transfer failed.
    pub fn restore(&mut self, payout: &Payout) -> Result<()> {
        warn!(passenger = %payout.passenger, flight_key = %payout.key, amount = %payout.amount, "Restoring credit after failed transfer");
        self.escrow.restore(payout)
    }

    /// Top up the reserve.
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount> {
        self.escrow.deposit(amount)
    }

    /// Whether `passenger` holds a policy on `key`
    pub fn is_passenger_insured(&self, passenger: &AccountId, key: &FlightKey) -> bool {
        self.policies
            .get(key)
            .is_some_and(|policies| policies.contains_key(passenger))
    }

    /// The passenger's policy on `key`, if any
    pub fn policy(&self, passenger: &AccountId, key: &FlightKey) -> Option<&InsurancePolicy> {
        self.policies.get(key).and_then(|p| p.get(passenger))
    }

    /// Registered flight by key
    pub fn flight(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(key)
    }

    /// Withdrawable credit for (`passenger`, `key`)
    pub fn credited_amount(&self, passenger: &AccountId, key: &FlightKey) -> Amount {
        self.escrow.credited(passenger, key)
    }

    /// Reserve and credits
    pub fn escrow(&self) -> &Escrow {
        &self.escrow
    }

    /// Value held in escrow
    pub fn reserve(&self) -> Amount {
        self.escrow.reserve()
    }
}

impl FlightDirectory for FlightLedger {
    fn is_flight_registered(&self, key: &FlightKey) -> bool {
        self.flights.contains_key(key)
    }
}
