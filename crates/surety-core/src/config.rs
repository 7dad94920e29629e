//! Surety configuration
//!
//! Defaults reproduce the deployed policy: 10 ether airline stake, premiums
//! capped at 1 ether, 1 ether oracle fee, voting from the 5th airline on,
//! three matching oracle reports for consensus, ten index buckets and a 150%
//! payout on airline-caused delays.
//!
//! Precedence: defaults < TOML file < `SURETY_*` environment variables.
//! Amounts are written with a unit (`"10 ether"`) since TOML integers cannot
//! hold wei-denominated values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::{Amount, Result, SuretyError};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "SURETY_";

/// Indexes assigned to every oracle
pub const INDEXES_PER_ORACLE: usize = 3;

/// Policy parameters shared by every component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuretyConfig {
    /// Minimum stake per funding deposit
    pub min_airline_funding: Amount,
    /// Upper bound on an insurance premium
    pub max_premium: Amount,
    /// Fixed oracle registration fee
    pub oracle_registration_fee: Amount,
    /// Registrations are immediate while fewer airlines than this are registered
    pub multiparty_threshold: usize,
    /// Matching oracle reports needed to finalize a status request
    pub min_responses: usize,
    /// Size of the oracle index space; indexes are drawn from `0..oracle_index_space`
    pub oracle_index_space: u8,
    /// Payout as an integer percentage of the premium (150 = 1.5x)
    pub payout_percentage: u16,
    /// Refuse insurance on flights whose timestamp is not in the future
    pub reject_departed_flights: bool,
    /// Capacity of the event broadcast buffer
    pub event_buffer: usize,
}

impl Default for SuretyConfig {
    fn default() -> Self {
        Self {
            min_airline_funding: Amount::ether(10),
            max_premium: Amount::ether(1),
            oracle_registration_fee: Amount::ether(1),
            multiparty_threshold: 4,
            min_responses: 3,
            oracle_index_space: 10,
            payout_percentage: 150,
            reject_departed_flights: false,
            event_buffer: 256,
        }
    }
}

fn parse_field<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| SuretyError::config(format!("invalid value for {key}: {e}")))
}

impl SuretyConfig {
    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SuretyConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SuretyError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "Loaded configuration file");
        Self::from_toml_str(&content)
    }

    /// Load from a file (if given), apply environment overrides, validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SURETY_*` overrides from the process environment.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `SURETY_*` overrides from an explicit variable list.
    ///
    /// `SURETY_MIN_RESPONSES=5` sets `min_responses`. Unrecognised
    /// `SURETY_*` names are skipped with a warning.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let key = key.to_ascii_lowercase();
            match self.set_from_string(&key, &value) {
                Ok(()) => debug!(key = %key, "Applied environment override"),
                Err(SuretyError::Config { message }) if message.starts_with("unknown key") => {
                    warn!(variable = %name, "Ignoring unrecognised environment override");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Set a single field from its string form.
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "min_airline_funding" => self.min_airline_funding = parse_field(key, value)?,
            "max_premium" => self.max_premium = parse_field(key, value)?,
            "oracle_registration_fee" => self.oracle_registration_fee = parse_field(key, value)?,
            "multiparty_threshold" => self.multiparty_threshold = parse_field(key, value)?,
            "min_responses" => self.min_responses = parse_field(key, value)?,
            "oracle_index_space" => self.oracle_index_space = parse_field(key, value)?,
            "payout_percentage" => self.payout_percentage = parse_field(key, value)?,
            "reject_departed_flights" => self.reject_departed_flights = parse_field(key, value)?,
            "event_buffer" => self.event_buffer = parse_field(key, value)?,
            other => return Err(SuretyError::config(format!("unknown key {other}"))),
        }
        Ok(())
    }

    /// Reject configurations the components cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.min_airline_funding.is_zero() {
            return Err(SuretyError::config("min_airline_funding must be non-zero"));
        }
        if self.max_premium.is_zero() {
            return Err(SuretyError::config("max_premium must be non-zero"));
        }
        if self.oracle_registration_fee.is_zero() {
            return Err(SuretyError::config("oracle_registration_fee must be non-zero"));
        }
        if self.min_responses == 0 {
            return Err(SuretyError::config("min_responses must be >= 1"));
        }
        if usize::from(self.oracle_index_space) < INDEXES_PER_ORACLE {
            return Err(SuretyError::config(format!(
                "oracle_index_space must be >= {INDEXES_PER_ORACLE} to draw distinct indexes"
            )));
        }
        if self.payout_percentage < 100 {
            return Err(SuretyError::config("payout_percentage must be >= 100"));
        }
        if self.event_buffer == 0 {
            return Err(SuretyError::config("event_buffer must be >= 1"));
        }
        Ok(())
    }
}
