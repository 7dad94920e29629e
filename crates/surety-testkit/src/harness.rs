//! Ready-made `FlightSurety` instances.

use std::sync::Arc;

use surety_app::{FlightSurety, SuretyEffects};
use surety_core::{AccountId, Amount, FlightRef, SuretyConfig, ValueTransferEffects};

use crate::accounts::{airline, owner};
use crate::effects::{FixedClock, RecordingTransfer, SeededRandom};

/// Departure time used by the default test flight.
pub const FLIGHT_TIMESTAMP: u64 = 1_591_878_209;

/// Clock reading at harness start; before [`FLIGHT_TIMESTAMP`].
pub const START_TIME: u64 = 1_591_000_000;

/// A facade wired to deterministic effects.
pub struct SuretyHarness {
    /// Facade under test
    pub surety: Arc<FlightSurety>,
    /// Contract owner
    pub owner: AccountId,
    /// Genesis airline, registered but unfunded
    pub first_airline: AccountId,
    /// Payouts made through the default transfer handler
    pub transfers: Arc<RecordingTransfer>,
    /// Clock read by the departure guard
    pub clock: Arc<FixedClock>,
}

impl SuretyHarness {
    /// Default configuration, recording transfers.
    pub fn new(seed: u64) -> Self {
        HarnessBuilder::new(seed).build()
    }

    /// Start from defaults and override pieces
    pub fn builder(seed: u64) -> HarnessBuilder {
        HarnessBuilder::new(seed)
    }

    /// Give the genesis airline its stake.
    pub fn fund_first_airline(&self) {
        self.surety
            .fund(self.first_airline, Amount::ether(10))
            .unwrap();
    }

    /// A flight of the genesis airline, not yet registered.
    pub fn flight(&self, number: &str) -> FlightRef {
        FlightRef::new(self.first_airline, number, FLIGHT_TIMESTAMP)
    }

    /// Fund the genesis airline and register one of its flights.
    pub fn registered_flight(&self, number: &str) -> FlightRef {
        if !self.surety.is_airline_funded(&self.first_airline) {
            self.fund_first_airline();
        }
        let flight = self.flight(number);
        self.surety
            .register_flight(flight.clone(), self.first_airline)
            .unwrap();
        flight
    }
}

/// Configures a [`SuretyHarness`]
pub struct HarnessBuilder {
    seed: u64,
    config: SuretyConfig,
    transfer: Option<Arc<dyn ValueTransferEffects>>,
}

impl HarnessBuilder {
    /// Defaults with index entropy seeded from `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            config: SuretyConfig::default(),
            transfer: None,
        }
    }

    /// Use `config` instead of the defaults
    pub fn config(mut self, config: SuretyConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the recording transfer handler. The harness' `transfers`
    /// then stays empty.
    pub fn transfer(mut self, transfer: Arc<dyn ValueTransferEffects>) -> Self {
        self.transfer = Some(transfer);
        self
    }

    /// Construct the facade. Installs test tracing.
    pub fn build(self) -> SuretyHarness {
        crate::init_test_tracing();
        let transfers = Arc::new(RecordingTransfer::default());
        let clock = Arc::new(FixedClock::new(START_TIME));
        let transfer = self
            .transfer
            .unwrap_or_else(|| transfers.clone() as Arc<dyn ValueTransferEffects>);
        let effects = SuretyEffects::new(transfer)
            .with_random(Arc::new(SeededRandom::new(self.seed)))
            .with_clock(clock.clone());
        let first_airline = airline(1);
        let surety = FlightSurety::new(self.config, owner(), first_airline, effects).unwrap();
        SuretyHarness {
            surety: Arc::new(surety),
            owner: owner(),
            first_airline,
            transfers,
            clock,
        }
    }
}
