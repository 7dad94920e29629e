//! Wall-clock time.
//!
//! Only the departure guard on insurance purchases reads the clock. The
//! returned value must use the same unit as the flight timestamps the
//! airlines register.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current time
pub trait PhysicalTimeEffects: Send + Sync {
    /// Current time, in flight-timestamp units
    fn now(&self) -> u64;
}

/// System clock reporting Unix seconds
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl PhysicalTimeEffects for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
