//! Outbound value movement.
//!
//! The ledger runtime is the only mover of value. Escrow payouts call out
//! through this trait after the credited balance has already been zeroed and
//! committed, so a handler that re-enters the system during the transfer
//! observes the post-withdrawal state.

use crate::{AccountId, Amount, Result};

/// Runtime hook that moves value out of the escrow
pub trait ValueTransferEffects: Send + Sync {
    /// Move `amount` out of the escrow to `to`.
    ///
    /// Returns `SuretyError::Transfer` if the runtime could not deliver.
    fn transfer(&self, to: &AccountId, amount: Amount) -> Result<()>;
}
