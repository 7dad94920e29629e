//! Deterministic and instrumented effect handlers.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use surety_app::FlightSurety;
use surety_core::{
    AccountId, Amount, FlightRef, PhysicalTimeEffects, RandomEffects, Result, SuretyError,
    ValueTransferEffects,
};

/// ChaCha20 seeded from a `u64`, so index assignment replays exactly.
pub struct SeededRandom(Mutex<ChaCha20Rng>);

impl SeededRandom {
    /// Seed the generator
    pub fn new(seed: u64) -> Self {
        Self(Mutex::new(ChaCha20Rng::seed_from_u64(seed)))
    }
}

impl RandomEffects for SeededRandom {
    fn random_index(&self, bound: u8) -> u8 {
        self.0.lock().gen_range(0..bound)
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    /// Clock stopped at `now`
    pub fn new(now: u64) -> Self {
        Self(AtomicU64::new(now))
    }

    /// Move the clock to `now`
    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }
}

impl PhysicalTimeEffects for FixedClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Accepts every transfer and remembers it.
#[derive(Debug, Default)]
pub struct RecordingTransfer {
    sent: Mutex<Vec<(AccountId, Amount)>>,
}

impl RecordingTransfer {
    /// Every transfer so far, in order
    pub fn sent(&self) -> Vec<(AccountId, Amount)> {
        self.sent.lock().clone()
    }

    /// Total received by `to`.
    pub fn received(&self, to: &AccountId) -> Amount {
        self.sent
            .lock()
            .iter()
            .filter(|(recipient, _)| recipient == to)
            .fold(Amount::ZERO, |acc, (_, amount)| {
                acc.checked_add(*amount).unwrap()
            })
    }
}

impl ValueTransferEffects for RecordingTransfer {
    fn transfer(&self, to: &AccountId, amount: Amount) -> Result<()> {
        self.sent.lock().push((*to, amount));
        Ok(())
    }
}

/// Rejects every transfer.
#[derive(Debug, Default)]
pub struct FailingTransfer;

impl ValueTransferEffects for FailingTransfer {
    fn transfer(&self, to: &AccountId, amount: Amount) -> Result<()> {
        Err(SuretyError::Transfer {
            to: *to,
            amount,
            message: "payee rejected transfer".to_string(),
        })
    }
}

/// Payee that calls back into `pay` for the same flight while being paid.
///
/// Attach the facade after construction with [`ReentrantPayee::attach`].
#[derive(Default)]
pub struct ReentrantPayee {
    surety: OnceLock<Weak<FlightSurety>>,
    flight: Mutex<Option<FlightRef>>,
    sent: Mutex<Vec<(AccountId, Amount)>>,
    entered: AtomicBool,
    reentries: Mutex<Vec<Result<Amount>>>,
}

impl ReentrantPayee {
    /// Point the payee at `surety`; it re-enters `pay` for `flight`.
    pub fn attach(&self, surety: &Arc<FlightSurety>, flight: FlightRef) {
        let _ = self.surety.set(Arc::downgrade(surety));
        *self.flight.lock() = Some(flight);
    }

    /// Transfers received, including the outer one
    pub fn sent(&self) -> Vec<(AccountId, Amount)> {
        self.sent.lock().clone()
    }

    /// Results of the nested `pay` calls, in order.
    pub fn reentries(&self) -> Vec<Result<Amount>> {
        self.reentries.lock().clone()
    }
}

impl ValueTransferEffects for ReentrantPayee {
    fn transfer(&self, to: &AccountId, amount: Amount) -> Result<()> {
        self.sent.lock().push((*to, amount));
        let flight = self.flight.lock().clone();
        let surety = self.surety.get().and_then(Weak::upgrade);
        if let (Some(surety), Some(flight)) = (surety, flight) {
            // Only the outermost call re-enters.
            if !self.entered.swap(true, Ordering::SeqCst) {
                let nested = surety.pay(&flight, *to);
                self.reentries.lock().push(nested);
            }
        }
        Ok(())
    }
}
