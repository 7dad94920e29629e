//! Effect handlers injected into the facade.

use std::sync::Arc;

use surety_core::{
    OsRandom, PhysicalTimeEffects, RandomEffects, SystemClock, ValueTransferEffects,
};

/// Handlers for everything the facade cannot compute from its own state.
#[derive(Clone)]
pub struct SuretyEffects {
    /// Oracle index entropy
    pub random: Arc<dyn RandomEffects>,
    /// Payout transfers
    pub transfer: Arc<dyn ValueTransferEffects>,
    /// Departure guard clock
    pub clock: Arc<dyn PhysicalTimeEffects>,
}

impl SuretyEffects {
    /// Production handlers around the runtime's transfer primitive.
    pub fn new(transfer: Arc<dyn ValueTransferEffects>) -> Self {
        Self {
            random: Arc::new(OsRandom),
            transfer,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the entropy source
    pub fn with_random(mut self, random: Arc<dyn RandomEffects>) -> Self {
        self.random = random;
        self
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn PhysicalTimeEffects>) -> Self {
        self.clock = clock;
        self
    }
}
