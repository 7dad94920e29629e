//! Owner-issued capabilities for privileged mutations
//!
//! Crediting insurees and releasing escrowed funds are only legal for the
//! single authorized caller chosen by the owner. Instead of a global flag the
//! check is carried as a value: the owner calls [`AccessControl::authorize`]
//! and receives an [`AuthorizedCaller`] token, which every privileged call
//! takes explicitly. Re-authorizing bumps an epoch, so tokens issued to a
//! previous caller stop verifying.
//!
//! The same structure carries the owner-controlled operational switch.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AccountId, Result, SuretyError};

/// Capability to perform privileged ledger mutations.
///
/// Only [`AccessControl::authorize`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedCaller {
    holder: AccountId,
    epoch: u64,
}

impl AuthorizedCaller {
    /// Account the capability was issued to
    pub fn holder(&self) -> AccountId {
        self.holder
    }

    /// Authorization epoch at issue time
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Owner, authorized caller and operational status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    owner: AccountId,
    authorized: Option<AccountId>,
    epoch: u64,
    operational: bool,
}

impl AccessControl {
    /// Operational, with no authorized caller yet.
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            authorized: None,
            epoch: 0,
            operational: true,
        }
    }

    /// Contract owner
    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Current capability holder, if any
    pub fn authorized_caller(&self) -> Option<AccountId> {
        self.authorized
    }

    /// Whether mutations are accepted
    pub fn is_operational(&self) -> bool {
        self.operational
    }

    fn require_owner(&self, by: &AccountId) -> Result<()> {
        if *by != self.owner {
            return Err(SuretyError::unauthorized(format!(
                "caller {by} is not the contract owner"
            )));
        }
        Ok(())
    }

    /// Make `caller` the sole authorized caller. Owner only.
    ///
    /// Any token issued before this call is revoked.
    pub fn authorize(&mut self, by: &AccountId, caller: AccountId) -> Result<AuthorizedCaller> {
        self.require_owner(by)?;
        self.epoch += 1;
        self.authorized = Some(caller);
        info!(caller = %caller, epoch = self.epoch, "Authorized caller set");
        Ok(AuthorizedCaller {
            holder: caller,
            epoch: self.epoch,
        })
    }

    /// Check a capability against the current authorization.
    pub fn verify(&self, token: &AuthorizedCaller) -> Result<()> {
        match self.authorized {
            Some(current) if current == token.holder && self.epoch == token.epoch => Ok(()),
            _ => Err(SuretyError::unauthorized(format!(
                "caller {} is not authorized (epoch {}, current {})",
                token.holder, token.epoch, self.epoch
            ))),
        }
    }

    /// Pause or resume all mutations. Owner only.
    pub fn set_operational(&mut self, by: &AccountId, operational: bool) -> Result<()> {
        self.require_owner(by)?;
        self.operational = operational;
        info!(operational, "Operational status changed");
        Ok(())
    }

    /// Fail with `Unauthorized` while paused.
    pub fn require_operational(&self) -> Result<()> {
        if !self.operational {
            return Err(SuretyError::unauthorized("contract is currently not operational"));
        }
        Ok(())
    }
}
