//! Status Request Transitions
//!
//! Pure functions `fn(state, params) -> TransitionResult`. No I/O, no
//! clocks, no randomness: the same inputs always produce the same state.

use std::collections::BTreeMap;

use surety_core::{AccountId, FlightRef, FlightStatus, SuretyError};

use super::state::{Quorum, RequestId, RequestPhase, StatusRequest};

/// Result of a state transition.
///
/// A disabled transition carries the error the caller should surface, so a
/// rejected response is always detectable.
#[derive(Debug, Clone)]
pub enum TransitionResult {
    /// Transition succeeded, new state produced
    Ok(StatusRequest),
    /// Transition was not enabled (precondition failed)
    NotEnabled(SuretyError),
}

impl TransitionResult {
    /// Whether the transition was enabled
    pub fn is_ok(&self) -> bool {
        matches!(self, TransitionResult::Ok(_))
    }

    /// Get the new state if transition succeeded
    pub fn state(self) -> Option<StatusRequest> {
        match self {
            TransitionResult::Ok(s) => Some(s),
            TransitionResult::NotEnabled(_) => None,
        }
    }

    /// Convert into a `Result`, surfacing the rejection error
    pub fn into_result(self) -> Result<StatusRequest, SuretyError> {
        match self {
            TransitionResult::Ok(s) => Ok(s),
            TransitionResult::NotEnabled(e) => Err(e),
        }
    }
}

/// Open a fresh request with no responses.
pub fn open_request(
    id: RequestId,
    flight: FlightRef,
    requester: AccountId,
    quorum: Quorum,
) -> StatusRequest {
    StatusRequest {
        id,
        flight,
        requester,
        responses: BTreeMap::new(),
        phase: RequestPhase::Open,
        quorum,
    }
}

/// Record `oracle`'s report of `status`.
///
/// Preconditions:
/// - Request is open
/// - Oracle has not reported on this request yet (for any status)
///
/// Effects:
/// - Adds the oracle to the voters for `status`
/// - Finalizes on `status` once its voters reach the quorum
pub fn apply_response(
    state: &StatusRequest,
    oracle: AccountId,
    status: FlightStatus,
) -> TransitionResult {
    if !state.is_open() {
        return TransitionResult::NotEnabled(SuretyError::RequestClosed {
            request: state.id.to_string(),
        });
    }

    if state.has_responded(&oracle) {
        return TransitionResult::NotEnabled(SuretyError::DuplicateResponse {
            oracle,
            request: state.id.to_string(),
        });
    }

    let mut new_state = state.clone();
    new_state.responses.entry(status).or_default().insert(oracle);

    if new_state.votes_for(status) >= new_state.quorum.get() {
        new_state.phase = RequestPhase::Finalized { status };
    }

    TransitionResult::Ok(new_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn oracle(n: u8) -> AccountId {
        AccountId::from_bytes([n; 20])
    }

    fn request(quorum: usize) -> StatusRequest {
        let flight = FlightRef::new(oracle(0), "AC110", 1_626_280_168);
        let id = RequestId {
            index: 4,
            key: flight.key(),
        };
        open_request(id, flight, oracle(99), Quorum::new(quorum).unwrap())
    }

    #[test]
    fn test_open_request_is_empty() {
        let state = request(3);
        assert!(state.is_open());
        assert_eq!(state.total_responses(), 0);
        assert_eq!(state.outcome(), None);
    }

    #[test]
    fn test_apply_response_accumulates() {
        let state = request(3);
        let state = apply_response(&state, oracle(1), FlightStatus::LateAirline)
            .state()
            .unwrap();
        let state = apply_response(&state, oracle(2), FlightStatus::LateAirline)
            .state()
            .unwrap();
        assert!(state.is_open());
        assert_eq!(state.votes_for(FlightStatus::LateAirline), 2);
    }

    #[test]
    fn test_apply_response_finalizes_at_quorum() {
        let mut state = request(3);
        for n in 1..=3 {
            state = apply_response(&state, oracle(n), FlightStatus::LateAirline)
                .state()
                .unwrap();
        }
        assert_eq!(state.outcome(), Some(FlightStatus::LateAirline));
    }

    #[test]
    fn test_split_votes_do_not_finalize() {
        let mut state = request(3);
        let reports = [
            FlightStatus::OnTime,
            FlightStatus::LateAirline,
            FlightStatus::OnTime,
            FlightStatus::LateWeather,
            FlightStatus::LateAirline,
        ];
        for (n, status) in reports.into_iter().enumerate() {
            state = apply_response(&state, oracle(n as u8 + 1), status)
                .state()
                .unwrap();
        }
        assert!(state.is_open());
        assert_eq!(state.total_responses(), 5);

        state = apply_response(&state, oracle(10), FlightStatus::OnTime)
            .state()
            .unwrap();
        assert_eq!(state.outcome(), Some(FlightStatus::OnTime));
    }

    #[test]
    fn test_duplicate_response_rejected() {
        let state = request(3);
        let state = apply_response(&state, oracle(1), FlightStatus::OnTime)
            .state()
            .unwrap();
        let result = apply_response(&state, oracle(1), FlightStatus::LateAirline);
        assert!(!result.is_ok());
        assert_matches!(
            result.into_result(),
            Err(SuretyError::DuplicateResponse { .. })
        );
    }

    #[test]
    fn test_response_after_finalization_rejected() {
        let state = request(1);
        let state = apply_response(&state, oracle(1), FlightStatus::OnTime)
            .state()
            .unwrap();
        assert!(!state.is_open());
        let result = apply_response(&state, oracle(2), FlightStatus::OnTime);
        assert_matches!(result.into_result(), Err(SuretyError::RequestClosed { .. }));
    }
}
