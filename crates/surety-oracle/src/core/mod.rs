//! Pure status-request core
//!
//! Effect-free state and transition functions. The coordinator in
//! [`crate::consensus`] owns the state maps; everything that decides whether a
//! response is accepted and whether it finalizes a request lives here.

pub mod state;
pub mod transitions;

pub use state::{Quorum, RequestId, RequestPhase, StatusRequest};
pub use transitions::{apply_response, open_request, TransitionResult};
