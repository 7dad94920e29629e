use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use surety_core::{AccountId, AirlineDirectory, Amount, Result, SuretyConfig, SuretyError};
use tracing::{debug, info};

/// Membership state of a known airline account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Membership {
    /// Not yet admitted; `votes` holds each distinct voter once.
    Pending {
        /// Airlines that voted for admission
        votes: BTreeSet<AccountId>,
    },
    /// Admitted member. Terminal.
    Registered,
}

/// One known airline account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineRecord {
    /// Airline identity
    pub id: AccountId,
    /// Admission state
    pub membership: Membership,
    /// Cumulative stake deposited
    pub funded_amount: Amount,
}

impl AirlineRecord {
    fn pending(id: AccountId) -> Self {
        Self {
            id,
            membership: Membership::Pending {
                votes: BTreeSet::new(),
            },
            funded_amount: Amount::ZERO,
        }
    }

    /// Admitted to the registry
    pub fn is_registered(&self) -> bool {
        matches!(self.membership, Membership::Registered)
    }

    /// Every accepted deposit meets the minimum, so any stake means funded.
    pub fn is_funded(&self) -> bool {
        !self.funded_amount.is_zero()
    }
}

/// What a registration call achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Candidate is now a member
    Registered,
    /// Vote counted, candidate still pending
    VoteRecorded {
        /// Distinct votes so far
        votes: usize,
        /// Votes needed for admission
        required: usize,
    },
}

/// Airline membership table and admission voting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirlineRegistry {
    airlines: BTreeMap<AccountId, AirlineRecord>,
    registered: usize,
    min_funding: Amount,
    multiparty_threshold: usize,
}

impl AirlineRegistry {
    /// Create a registry seeded with the genesis airline.
    pub fn new(config: &SuretyConfig, genesis: AccountId) -> Self {
        let mut airlines = BTreeMap::new();
        airlines.insert(
            genesis,
            AirlineRecord {
                id: genesis,
                membership: Membership::Registered,
                funded_amount: Amount::ZERO,
            },
        );
        info!(airline = %genesis, "Genesis airline registered");
        Self {
            airlines,
            registered: 1,
            min_funding: config.min_airline_funding,
            multiparty_threshold: config.multiparty_threshold,
        }
    }

    /// Deposit stake for `airline`. Cumulative; returns the new total.
    pub fn fund(&mut self, airline: AccountId, amount: Amount) -> Result<Amount> {
        if amount < self.min_funding {
            return Err(SuretyError::InsufficientFunds {
                minimum: self.min_funding,
                provided: amount,
            });
        }
        let current = self
            .airlines
            .get(&airline)
            .map(|a| a.funded_amount)
            .unwrap_or(Amount::ZERO);
        let total = current.checked_add(amount)?;

        self.airlines
            .entry(airline)
            .or_insert_with(|| AirlineRecord::pending(airline))
            .funded_amount = total;
        info!(airline = %airline, amount = %amount, total = %total, "Airline funded");
        Ok(total)
    }

    /// Nominate or vote for `candidate` on behalf of `by`.
    pub fn register_airline(
        &mut self,
        candidate: AccountId,
        by: AccountId,
    ) -> Result<RegistrationOutcome> {
        if !self.is_airline_active(&by) {
            return Err(SuretyError::unauthorized(format!(
                "airline {by} must be registered and funded to register airlines"
            )));
        }
        if self.is_airline_registered(&candidate) {
            return Err(SuretyError::AlreadyRegistered { airline: candidate });
        }

        if self.registered < self.multiparty_threshold {
            self.admit(candidate);
            info!(airline = %candidate, by = %by, "Airline registered without vote");
            return Ok(RegistrationOutcome::Registered);
        }

        if self.has_voted(&candidate, &by) {
            return Err(SuretyError::DuplicateVote {
                candidate,
                voter: by,
            });
        }
        let required = self.required_votes();
        let count = self.pending_votes(&candidate).len() + 1;

        if count >= required {
            self.admit(candidate);
            info!(airline = %candidate, by = %by, votes = count, required, "Airline registered by vote");
            return Ok(RegistrationOutcome::Registered);
        }

        let record = self
            .airlines
            .entry(candidate)
            .or_insert_with(|| AirlineRecord::pending(candidate));
        if let Membership::Pending { votes } = &mut record.membership {
            votes.insert(by);
        }
        debug!(candidate = %candidate, voter = %by, votes = count, required, "Registration vote recorded");
        Ok(RegistrationOutcome::VoteRecorded {
            votes: count,
            required,
        })
    }

    fn admit(&mut self, candidate: AccountId) {
        self.airlines
            .entry(candidate)
            .or_insert_with(|| AirlineRecord::pending(candidate))
            .membership = Membership::Registered;
        self.registered += 1;
    }

    fn has_voted(&self, candidate: &AccountId, voter: &AccountId) -> bool {
        match self.airlines.get(candidate).map(|a| &a.membership) {
            Some(Membership::Pending { votes }) => votes.contains(voter),
            _ => false,
        }
    }

    /// Votes needed to admit the next candidate: `ceil(registered / 2)`.
    pub fn required_votes(&self) -> usize {
        self.registered.div_ceil(2)
    }

    /// Number of admitted airlines
    pub fn registered_count(&self) -> usize {
        self.registered
    }

    /// Stake deposited by `airline`; zero if unknown
    pub fn funded_amount(&self, airline: &AccountId) -> Amount {
        self.airlines
            .get(airline)
            .map(|a| a.funded_amount)
            .unwrap_or(Amount::ZERO)
    }

    /// Airlines that voted for a pending candidate.
    pub fn pending_votes(&self, candidate: &AccountId) -> Vec<AccountId> {
        match self.airlines.get(candidate).map(|a| &a.membership) {
            Some(Membership::Pending { votes }) => votes.iter().copied().collect(),
            _ => Vec::new(),
        }
    }

    /// Record for `airline`, if it has registered, funded or been nominated
    pub fn get(&self, airline: &AccountId) -> Option<&AirlineRecord> {
        self.airlines.get(airline)
    }
}

impl AirlineDirectory for AirlineRegistry {
    fn is_airline_registered(&self, airline: &AccountId) -> bool {
        self.airlines
            .get(airline)
            .is_some_and(AirlineRecord::is_registered)
    }

    fn is_airline_funded(&self, airline: &AccountId) -> bool {
        self.airlines.get(airline).is_some_and(AirlineRecord::is_funded)
    }
}
