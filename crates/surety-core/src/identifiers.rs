//! Account identifiers
//!
//! The ledger runtime authenticates every caller and hands the core a
//! 20-byte account identity. Airlines, passengers, oracles, the owner and the
//! application itself are all plain accounts; roles are tracked by the
//! components, never encoded in the identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::hash;

/// Authenticated caller identity
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId([u8; 20]);

impl AccountId {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Create an account ID from caller-provided entropy.
    pub fn new_from_entropy(entropy: [u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&entropy[..20]);
        Self(bytes)
    }

    /// Derive a stable account ID from a human-readable label.
    ///
    /// Used for well-known system accounts and fixtures.
    pub fn derived(label: &str) -> Self {
        let mut h = hash::hasher();
        h.update(b"SURETY_ACCOUNT");
        h.update_prefixed(label.as_bytes());
        Self::new_from_entropy(h.finalize().0)
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({self})")
    }
}

/// Parse failure for account IDs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountIdError {
    /// Input was not hex
    #[error("invalid hex in account id: {0}")]
    Hex(String),
    /// Decoded to the wrong number of bytes
    #[error("account id must be 20 bytes, got {0}")]
    Length(usize),
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|e| AccountIdError::Hex(e.to_string()))?;
        let bytes: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AccountIdError::Length(bytes.len()))?;
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_string()
    }
}
