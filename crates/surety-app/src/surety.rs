use parking_lot::Mutex;
use surety_core::{
    AccountId, AirlineDirectory, Amount, AuthorizedCaller, FlightKey, FlightRef, FlightStatus,
    Result, SuretyConfig, SuretyError, SuretyEvent,
};
use surety_ledger::CreditSummary;
use surety_oracle::{OracleIndexes, RequestId, ResponseOutcome, StatusRequest};
use surety_registry::RegistrationOutcome;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::effects::SuretyEffects;
use crate::state::SuretyState;

/// Label the facade's own account is derived from.
pub const APP_ACCOUNT_LABEL: &str = "flight-surety-app";

/// Flight-delay insurance coordinator.
///
/// Thread-safe; share it behind an `Arc`. Mutations are serialized and
/// all-or-nothing, queries never fail and never mutate.
pub struct FlightSurety {
    state: Mutex<SuretyState>,
    effects: SuretyEffects,
    events: broadcast::Sender<SuretyEvent>,
    app: AccountId,
}

impl std::fmt::Debug for FlightSurety {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightSurety")
            .field("app", &self.app)
            .finish_non_exhaustive()
    }
}

impl FlightSurety {
    /// Validate `config`, seed the registry with `first_airline` and
    /// authorize the facade for privileged ledger calls.
    pub fn new(
        config: SuretyConfig,
        owner: AccountId,
        first_airline: AccountId,
        effects: SuretyEffects,
    ) -> Result<Self> {
        config.validate()?;
        let app = AccountId::derived(APP_ACCOUNT_LABEL);
        let state = SuretyState::new(&config, owner, app, first_airline)?;
        let (events, _) = broadcast::channel(config.event_buffer);
        info!(owner = %owner, first_airline = %first_airline, app = %app, "FlightSurety initialized");
        Ok(Self {
            state: Mutex::new(state),
            effects,
            events,
            app,
        })
    }

    /// Account the facade holds the privileged capability as.
    pub fn app_account(&self) -> AccountId {
        self.app
    }

    /// Run `op` against a copy of the state and commit only on success.
    ///
    /// Events are published before the guard drops, so subscribers observe
    /// them in commit order.
    fn transact<T>(
        &self,
        op: impl FnOnce(&mut SuretyState, &mut Vec<SuretyEvent>) -> Result<T>,
    ) -> Result<T> {
        let mut events = Vec::new();
        let mut guard = self.state.lock();
        let mut next = guard.clone();
        match op(&mut next, &mut events) {
            Ok(value) => {
                *guard = next;
                for event in events {
                    self.publish(event);
                }
                Ok(value)
            }
            Err(err) => {
                debug!(error = %err, kind = ?err.kind(), "Operation rejected");
                Err(err)
            }
        }
    }

    /// Called with the state guard held. `broadcast::Sender::send` never blocks.
    fn publish(&self, event: SuretyEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn read<T>(&self, f: impl FnOnce(&SuretyState) -> T) -> T {
        f(&*self.state.lock())
    }

    /// Receive every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SuretyEvent> {
        self.events.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SuretyState {
        self.read(SuretyState::clone)
    }

    // Airline registry

    /// Deposit stake for `airline`; returns its cumulative stake.
    pub fn fund(&self, airline: AccountId, amount: Amount) -> Result<Amount> {
        self.transact(|state, events| state.apply_fund(airline, amount, events))
    }

    /// Nominate `candidate`, or vote for it once multiparty voting applies.
    pub fn register_airline(
        &self,
        candidate: AccountId,
        by: AccountId,
    ) -> Result<RegistrationOutcome> {
        self.transact(|state, events| state.apply_register_airline(candidate, by, events))
    }

    /// Whether `airline` is an admitted member
    pub fn is_airline_registered(&self, airline: &AccountId) -> bool {
        self.read(|state| state.registry.is_airline_registered(airline))
    }

    /// Whether `airline` has paid its stake
    pub fn is_airline_funded(&self, airline: &AccountId) -> bool {
        self.read(|state| state.registry.is_airline_funded(airline))
    }

    /// Number of admitted airlines
    pub fn airline_count(&self) -> usize {
        self.read(|state| state.registry.registered_count())
    }

    /// Airlines that voted for a pending candidate
    pub fn pending_votes(&self, candidate: &AccountId) -> Vec<AccountId> {
        self.read(|state| state.registry.pending_votes(candidate))
    }

    // Flights and insurance

    /// Register a flight of the calling airline. `by` must be that airline,
    /// registered and funded.
    pub fn register_flight(&self, flight: FlightRef, by: AccountId) -> Result<FlightKey> {
        let key = flight.key();
        self.transact(|state, events| state.apply_register_flight(flight, by, events))?;
        Ok(key)
    }

    /// Insure `passenger` on `flight` for a premium of `value`.
    pub fn buy(&self, flight: &FlightRef, passenger: AccountId, value: Amount) -> Result<()> {
        let now = self.effects.clock.now();
        self.transact(|state, events| state.apply_buy(flight, passenger, value, now, events))
    }

    /// Whether `passenger` holds a policy on `key`
    pub fn is_passenger_insured(&self, passenger: &AccountId, key: &FlightKey) -> bool {
        self.read(|state| state.ledger.is_passenger_insured(passenger, key))
    }

    /// Consensus status of a registered flight
    pub fn flight_status(&self, key: &FlightKey) -> Option<FlightStatus> {
        self.read(|state| state.ledger.flight(key).map(|f| f.status))
    }

    /// Credit `passenger` can withdraw for `key`
    pub fn credited_amount(&self, passenger: &AccountId, key: &FlightKey) -> Amount {
        self.read(|state| state.ledger.credited_amount(passenger, key))
    }

    /// Value held in escrow
    pub fn reserve(&self) -> Amount {
        self.read(|state| state.ledger.reserve())
    }

    /// Credit a flight's insurees on behalf of an externally authorized
    /// caller. Consensus finalization does this automatically.
    pub fn credit_insurees(
        &self,
        caller: &AuthorizedCaller,
        flight: &FlightRef,
        payout_percentage: u16,
    ) -> Result<CreditSummary> {
        self.transact(|state, events| {
            state.apply_credit_insurees(caller, flight, payout_percentage, events)
        })
    }

    // Oracle consensus

    /// Register `oracle` against `fee` and return its assigned indexes.
    pub fn register_oracle(&self, oracle: AccountId, fee: Amount) -> Result<OracleIndexes> {
        let rng = self.effects.random.as_ref();
        self.transact(|state, events| state.apply_register_oracle(oracle, fee, rng, events))
    }

    /// Indexes assigned to `oracle`
    pub fn get_my_indexes(&self, oracle: &AccountId) -> Result<OracleIndexes> {
        self.read(|state| state.oracles.get_my_indexes(oracle))
    }

    /// Ask the oracles for a flight's status. Emits `OracleRequest` naming the bucket.
    pub fn fetch_flight_status(&self, flight: FlightRef, by: AccountId) -> Result<RequestId> {
        self.transact(|state, events| state.apply_fetch_flight_status(flight, by, events))
    }

    /// Record an oracle report. Completing the quorum settles the flight and,
    /// for an airline-caused delay, credits its insurees.
    pub fn submit_oracle_response(
        &self,
        oracle: AccountId,
        index: u8,
        flight: &FlightRef,
        status: FlightStatus,
    ) -> Result<ResponseOutcome> {
        self.transact(|state, events| {
            state.apply_oracle_response(oracle, index, flight, status, events)
        })
    }

    /// As [`Self::submit_oracle_response`], for a raw status code.
    pub fn submit_oracle_code(
        &self,
        oracle: AccountId,
        index: u8,
        flight: &FlightRef,
        code: u8,
    ) -> Result<ResponseOutcome> {
        let status = FlightStatus::try_from(code)?;
        self.submit_oracle_response(oracle, index, flight, status)
    }

    /// Status request routed to `index` for `flight`, if one was opened
    pub fn request_state(&self, index: u8, flight: &FlightRef) -> Option<StatusRequest> {
        let id = RequestId {
            index,
            key: flight.key(),
        };
        self.read(|state| state.oracles.request(&id).cloned())
    }

    // Escrow

    /// Withdraw the passenger's credit for `flight`.
    ///
    /// The credit is zeroed and committed before the transfer runs. If the
    /// transfer fails the credit is restored and the transfer error returned.
    pub fn pay(&self, flight: &FlightRef, passenger: AccountId) -> Result<Amount> {
        let payout = self.transact(|state, _| state.apply_release(flight, passenger))?;

        if let Err(err) = self.effects.transfer.transfer(&passenger, payout.amount) {
            warn!(passenger = %passenger, amount = %payout.amount, error = %err, "Payout transfer failed");
            self.transact(|state, _| state.apply_restore(&payout))?;
            return Err(match err {
                SuretyError::Transfer { .. } => err,
                other => SuretyError::Transfer {
                    to: passenger,
                    amount: payout.amount,
                    message: other.to_string(),
                },
            });
        }

        info!(passenger = %passenger, flight_key = %payout.key, amount = %payout.amount, "Payout sent");
        let _guard = self.state.lock();
        self.publish(SuretyEvent::PayoutSent {
            passenger,
            key: payout.key,
            amount: payout.amount,
        });
        Ok(payout.amount)
    }

    /// Top up the payout reserve.
    pub fn deposit(&self, from: AccountId, amount: Amount) -> Result<Amount> {
        self.transact(|state, _| state.apply_deposit(from, amount))
    }

    // Administration

    /// Owner-only. Revokes every previously issued capability.
    pub fn set_authorized_caller(
        &self,
        by: AccountId,
        caller: AccountId,
    ) -> Result<AuthorizedCaller> {
        let app = self.app;
        self.transact(|state, events| state.apply_authorize(by, caller, app, events))
    }

    /// Owner-only. While paused every mutation except this one is rejected.
    pub fn set_operational(&self, by: AccountId, operational: bool) -> Result<()> {
        self.transact(|state, events| state.apply_set_operational(by, operational, events))
    }

    /// Whether mutations are accepted
    pub fn is_operational(&self) -> bool {
        self.read(|state| state.ledger.access().is_operational())
    }
}
