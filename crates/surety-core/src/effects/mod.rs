//! Effect interfaces
//!
//! The bookkeeping components are pure: anything that touches the outside
//! world (entropy, wall-clock time, moving value) goes through one of these
//! traits so tests can substitute deterministic handlers.
//!
//! All effects are synchronous. The ledger runtime executes each operation to
//! completion; nothing inside the core waits.

pub mod random;
pub mod time;
pub mod transfer;

pub use random::{OsRandom, RandomEffects};
pub use time::{PhysicalTimeEffects, SystemClock};
pub use transfer::ValueTransferEffects;
