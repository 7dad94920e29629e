//! Surety Testing Infrastructure
//!
//! Deterministic effect handlers and fixtures shared by the integration
//! tests of every Surety crate.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! surety-testkit = { path = "../surety-testkit" }
//! ```
//!
//! ```rust,no_run
//! use surety_testkit::*;
//!
//! #[test]
//! fn my_test() {
//!     let h = SuretyHarness::new(42);
//!     h.fund_first_airline();
//!     // ... test logic
//! }
//! ```

pub mod accounts;
pub mod effects;
pub mod harness;
pub mod oracles;

pub use accounts::*;
pub use effects::*;
pub use harness::*;
pub use oracles::*;

/// Install a `fmt` subscriber filtered by `RUST_LOG`. Safe to call from
/// every test; only the first call takes effect.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
