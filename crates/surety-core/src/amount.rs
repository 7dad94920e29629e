//! Money in the ledger's smallest indivisible unit
//!
//! `Amount` wraps a `u128` count of wei. All arithmetic is checked and
//! integral; percentages are applied as `value * pct / 100` on the integer,
//! so a 150% payout on 1 ether is exactly 1.5 ether with no rounding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Result, SuretyError};

/// Wei per gwei
pub const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Wei per ether (one "unit" of native value)
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Value in wei
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    /// Zero value
    pub const ZERO: Amount = Amount(0);

    /// Create from a raw wei count
    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    /// Whole ether
    pub const fn ether(units: u64) -> Self {
        Self(units as u128 * WEI_PER_ETHER)
    }

    /// Whole gwei
    pub const fn gwei(units: u64) -> Self {
        Self(units as u128 * WEI_PER_GWEI)
    }

    /// Raw wei count
    pub const fn wei(self) -> u128 {
        self.0
    }

    /// Whether this is zero wei
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Sum, or `Overflow`
    pub fn checked_add(self, other: Amount) -> Result<Amount> {
        self.0
            .checked_add(other.0)
            .map(Amount)
            .ok_or_else(|| SuretyError::overflow(format!("{self} + {other}")))
    }

    /// Difference, or `Overflow` when `other` is larger
    pub fn checked_sub(self, other: Amount) -> Result<Amount> {
        self.0
            .checked_sub(other.0)
            .map(Amount)
            .ok_or_else(|| SuretyError::overflow(format!("{self} - {other}")))
    }

    /// `self * percentage / 100`, truncating toward zero in wei.
    pub fn percent(self, percentage: u16) -> Result<Amount> {
        self.0
            .checked_mul(u128::from(percentage))
            .map(|scaled| Amount(scaled / 100))
            .ok_or_else(|| SuretyError::overflow(format!("{self} * {percentage}%")))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / WEI_PER_ETHER;
        let frac = self.0 % WEI_PER_ETHER;
        if frac == 0 {
            return write!(f, "{whole} ether");
        }
        let digits = format!("{frac:018}");
        write!(f, "{whole}.{} ether", digits.trim_end_matches('0'))
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({} wei)", self.0)
    }
}

/// Parse failure for amount literals
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount '{input}': {reason}")]
pub struct AmountParseError {
    input: String,
    reason: &'static str,
}

impl AmountParseError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

fn unit_scale(unit: &str) -> Option<(u128, usize)> {
    match unit.to_ascii_lowercase().as_str() {
        "wei" => Some((1, 0)),
        "gwei" => Some((WEI_PER_GWEI, 9)),
        "ether" | "eth" => Some((WEI_PER_ETHER, 18)),
        _ => None,
    }
}

fn parse_digits(input: &str, digits: &str) -> std::result::Result<u128, AmountParseError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountParseError::new(input, "expected decimal digits"));
    }
    digits
        .parse::<u128>()
        .map_err(|_| AmountParseError::new(input, "value too large"))
}

/// Accepts `"<number> <unit>"` (`wei`, `gwei`, `ether`) or a bare wei count.
/// Fractions are allowed down to one wei.
impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let number = parts
            .next()
            .ok_or_else(|| AmountParseError::new(s, "empty"))?;
        let unit = parts.next().unwrap_or("wei");
        if parts.next().is_some() {
            return Err(AmountParseError::new(s, "trailing input"));
        }
        let (scale, decimals) =
            unit_scale(unit).ok_or_else(|| AmountParseError::new(s, "unknown unit"))?;

        let (whole, frac) = match number.split_once('.') {
            Some((w, f)) => (w, f),
            None => (number, ""),
        };
        let whole = parse_digits(s, whole)?;
        let frac_wei = if frac.is_empty() {
            0
        } else {
            if frac.len() > decimals {
                return Err(AmountParseError::new(s, "more precision than one wei"));
            }
            let padded = format!("{frac:0<decimals$}");
            parse_digits(s, &padded)?
        };

        whole
            .checked_mul(scale)
            .and_then(|w| w.checked_add(frac_wei))
            .map(Amount)
            .ok_or_else(|| AmountParseError::new(s, "value too large"))
    }
}

impl TryFrom<String> for Amount {
    type Error = AmountParseError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}
