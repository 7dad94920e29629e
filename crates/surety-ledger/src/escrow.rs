//! Reserve and withdrawable credits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use surety_core::{AccountId, Amount, FlightKey, Result, SuretyError};
use tracing::debug;

/// A released credit awaiting its outbound transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    /// Recipient
    pub passenger: AccountId,
    /// Flight the credit was for
    pub key: FlightKey,
    /// Value to transfer
    pub amount: Amount,
}

/// Pooled reserve and the credits passengers may withdraw from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Escrow {
    reserve: Amount,
    credits: BTreeMap<(AccountId, FlightKey), Amount>,
}

impl Escrow {
    /// Add inbound value (stakes, premiums, fees, top-ups).
    pub fn deposit(&mut self, amount: Amount) -> Result<Amount> {
        self.reserve = self.reserve.checked_add(amount)?;
        Ok(self.reserve)
    }

    /// Add `amount` to the passenger's withdrawable credit for `key`.
    pub fn credit(&mut self, passenger: AccountId, key: FlightKey, amount: Amount) -> Result<()> {
        let slot = self.credits.entry((passenger, key)).or_insert(Amount::ZERO);
        *slot = slot.checked_add(amount)?;
        debug!(passenger = %passenger, flight_key = %key, amount = %amount, "Credit recorded");
        Ok(())
    }

    /// Zero the credit and debit the reserve. The returned payout must be
    /// transferred by the caller after committing.
    pub fn release(&mut self, passenger: AccountId, key: FlightKey) -> Result<Payout> {
        let amount = self.credited(&passenger, &key);
        if amount.is_zero() {
            return Err(SuretyError::NotInsured { passenger, key });
        }
        if self.reserve < amount {
            return Err(SuretyError::InsufficientReserve {
                available: self.reserve,
                requested: amount,
            });
        }
        self.reserve = self.reserve.checked_sub(amount)?;
        self.credits.remove(&(passenger, key));
        Ok(Payout {
            passenger,
            key,
            amount,
        })
    }

    /// Undo a release whose transfer failed.
    pub fn restore(&mut self, payout: &Payout) -> Result<()> {
        self.reserve = self.reserve.checked_add(payout.amount)?;
        self.credit(payout.passenger, payout.key, payout.amount)
    }

    /// Withdrawable credit; zero if none
    pub fn credited(&self, passenger: &AccountId, key: &FlightKey) -> Amount {
        self.credits
            .get(&(*passenger, *key))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Value held
    pub fn reserve(&self) -> Amount {
        self.reserve
    }
}
