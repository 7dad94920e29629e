//! Composite state and the operations applied to it.
//!
//! Each `apply_*` method is the body of one public operation. It mutates the
//! state in place and pushes the events it produced; the facade runs it on a
//! copy and discards both on error.

use surety_core::{
    AccountId, Amount, AuthorizedCaller, FlightRef, FlightStatus, RandomEffects, Result,
    SuretyConfig, SuretyError, SuretyEvent,
};
use surety_ledger::{CreditSummary, FlightLedger, Payout};
use surety_oracle::{OracleConsensus, OracleIndexes, RequestId, ResponseOutcome};
use surety_registry::{AirlineRegistry, RegistrationOutcome};
use tracing::info;

/// Everything the facade commits atomically
#[derive(Debug, Clone)]
pub struct SuretyState {
    pub(crate) registry: AirlineRegistry,
    pub(crate) ledger: FlightLedger,
    pub(crate) oracles: OracleConsensus,
    /// Capability the facade holds for privileged ledger calls.
    pub(crate) grant: AuthorizedCaller,
    payout_percentage: u16,
}

impl SuretyState {
    pub(crate) fn new(
        config: &SuretyConfig,
        owner: AccountId,
        app: AccountId,
        first_airline: AccountId,
    ) -> Result<Self> {
        let registry = AirlineRegistry::new(config, first_airline);
        let mut ledger = FlightLedger::new(config, owner);
        let grant = ledger.authorize(&owner, app)?;
        Ok(Self {
            registry,
            ledger,
            oracles: OracleConsensus::new(config)?,
            grant,
            payout_percentage: config.payout_percentage,
        })
    }

    /// Airline membership
    pub fn registry(&self) -> &AirlineRegistry {
        &self.registry
    }

    /// Flights, policies and escrow
    pub fn ledger(&self) -> &FlightLedger {
        &self.ledger
    }

    /// Oracle table and status requests
    pub fn oracles(&self) -> &OracleConsensus {
        &self.oracles
    }

    fn require_operational(&self) -> Result<()> {
        self.ledger.access().require_operational()
    }

    pub(crate) fn apply_fund(
        &mut self,
        airline: AccountId,
        amount: Amount,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<Amount> {
        self.require_operational()?;
        let total = self.registry.fund(airline, amount)?;
        self.ledger.deposit(amount)?;
        events.push(SuretyEvent::AirlineFunded {
            airline,
            amount,
            total,
        });
        Ok(total)
    }

    pub(crate) fn apply_register_airline(
        &mut self,
        candidate: AccountId,
        by: AccountId,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<RegistrationOutcome> {
        self.require_operational()?;
        let outcome = self.registry.register_airline(candidate, by)?;
        events.push(match outcome {
            RegistrationOutcome::Registered => SuretyEvent::AirlineRegistered {
                airline: candidate,
                by,
            },
            RegistrationOutcome::VoteRecorded { votes, required } => SuretyEvent::AirlineVoteCast {
                candidate,
                voter: by,
                votes,
                required,
            },
        });
        Ok(outcome)
    }

    pub(crate) fn apply_register_flight(
        &mut self,
        flight: FlightRef,
        by: AccountId,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<()> {
        self.require_operational()?;
        let key = self
            .ledger
            .register_flight(&self.registry, flight.clone(), by)?;
        events.push(SuretyEvent::FlightRegistered { flight, key });
        Ok(())
    }

    pub(crate) fn apply_buy(
        &mut self,
        flight: &FlightRef,
        passenger: AccountId,
        value: Amount,
        now: u64,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<()> {
        self.require_operational()?;
        let policy = self.ledger.buy(flight, passenger, value, now)?;
        events.push(SuretyEvent::InsurancePurchased {
            passenger,
            key: policy.key,
            premium: policy.premium,
        });
        Ok(())
    }

    pub(crate) fn apply_register_oracle(
        &mut self,
        oracle: AccountId,
        fee: Amount,
        rng: &dyn RandomEffects,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<OracleIndexes> {
        self.require_operational()?;
        let indexes = self.oracles.register_oracle(oracle, fee, rng)?;
        self.ledger.deposit(fee)?;
        events.push(SuretyEvent::OracleRegistered {
            oracle,
            indexes: indexes.as_array(),
        });
        Ok(indexes)
    }

    pub(crate) fn apply_fetch_flight_status(
        &mut self,
        flight: FlightRef,
        by: AccountId,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<RequestId> {
        self.require_operational()?;
        let id = self
            .oracles
            .fetch_flight_status(&self.ledger, flight.clone(), by)?;
        events.push(SuretyEvent::OracleRequest {
            index: id.index,
            airline: flight.airline,
            flight: flight.flight,
            timestamp: flight.timestamp,
        });
        Ok(id)
    }

    /// Record a report; on consensus set the flight status and, for a
    /// qualifying delay, credit the insurees.
    pub(crate) fn apply_oracle_response(
        &mut self,
        oracle: AccountId,
        index: u8,
        flight: &FlightRef,
        status: FlightStatus,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<ResponseOutcome> {
        self.require_operational()?;
        let outcome = self
            .oracles
            .submit_oracle_response(oracle, index, flight, status)?;
        let key = flight.key();
        let votes = self
            .oracles
            .request(&RequestId { index, key })
            .map_or(0, |request| request.votes_for(status));
        events.push(SuretyEvent::OracleReport {
            oracle,
            index,
            flight: flight.clone(),
            status,
            votes,
        });

        if let ResponseOutcome::Finalized { status } = outcome {
            self.ledger.set_status(&self.grant, &key, status)?;
            events.push(SuretyEvent::FlightStatusInfo {
                flight: flight.clone(),
                status,
            });
            if status.qualifies_for_payout() {
                let grant = self.grant.clone();
                let summary = self.apply_credit(&grant, flight, self.payout_percentage)?;
                if !summary.already_credited {
                    events.push(SuretyEvent::InsureesCredited {
                        key,
                        policies: summary.policies,
                        total: summary.total,
                    });
                }
            }
        }
        Ok(outcome)
    }

    fn apply_credit(
        &mut self,
        caller: &AuthorizedCaller,
        flight: &FlightRef,
        payout_percentage: u16,
    ) -> Result<CreditSummary> {
        self.ledger.credit_insurees(caller, flight, payout_percentage)
    }

    pub(crate) fn apply_credit_insurees(
        &mut self,
        caller: &AuthorizedCaller,
        flight: &FlightRef,
        payout_percentage: u16,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<CreditSummary> {
        self.require_operational()?;
        let summary = self.apply_credit(caller, flight, payout_percentage)?;
        if !summary.already_credited {
            events.push(SuretyEvent::InsureesCredited {
                key: summary.key,
                policies: summary.policies,
                total: summary.total,
            });
        }
        Ok(summary)
    }

    pub(crate) fn apply_release(
        &mut self,
        flight: &FlightRef,
        passenger: AccountId,
    ) -> Result<Payout> {
        self.require_operational()?;
        let grant = self.grant.clone();
        self.ledger.release(&grant, flight, passenger)
    }

    pub(crate) fn apply_restore(&mut self, payout: &Payout) -> Result<()> {
        self.ledger.restore(payout)
    }

    pub(crate) fn apply_deposit(&mut self, from: AccountId, amount: Amount) -> Result<Amount> {
        self.require_operational()?;
        if amount.is_zero() {
            return Err(SuretyError::InsufficientFunds {
                minimum: Amount::from_wei(1),
                provided: amount,
            });
        }
        let reserve = self.ledger.deposit(amount)?;
        info!(from = %from, amount = %amount, reserve = %reserve, "Reserve topped up");
        Ok(reserve)
    }

    /// Owner-only. Re-issues the privileged capability; if it goes to the
    /// facade's own account the facade's grant is refreshed.
    pub(crate) fn apply_authorize(
        &mut self,
        by: AccountId,
        caller: AccountId,
        app: AccountId,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<AuthorizedCaller> {
        let token = self.ledger.authorize(&by, caller)?;
        if caller == app {
            self.grant = token.clone();
        }
        events.push(SuretyEvent::AuthorizedCallerChanged { caller });
        Ok(token)
    }

    pub(crate) fn apply_set_operational(
        &mut self,
        by: AccountId,
        operational: bool,
        events: &mut Vec<SuretyEvent>,
    ) -> Result<()> {
        self.ledger.set_operational(&by, operational)?;
        events.push(SuretyEvent::OperationalChanged { operational });
        Ok(())
    }
}
