//! Oracle registration, request routing and quorum behaviour.

use std::collections::BTreeSet;
use std::sync::Mutex;

use assert_matches::assert_matches;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use surety_core::{
    AccountId, Amount, ErrorKind, FlightDirectory, FlightKey, FlightRef, FlightStatus,
    RandomEffects, SuretyConfig, SuretyError,
};
use surety_oracle::{OracleConsensus, RequestPhase, ResponseOutcome};

struct Seeded(Mutex<ChaCha20Rng>);

impl Seeded {
    fn new(seed: u64) -> Self {
        Self(Mutex::new(ChaCha20Rng::seed_from_u64(seed)))
    }
}

impl RandomEffects for Seeded {
    fn random_index(&self, bound: u8) -> u8 {
        self.0.lock().unwrap().gen_range(0..bound)
    }
}

#[derive(Default)]
struct Flights(BTreeSet<FlightKey>);

impl FlightDirectory for Flights {
    fn is_flight_registered(&self, key: &FlightKey) -> bool {
        self.0.contains(key)
    }
}

fn flight() -> FlightRef {
    FlightRef::new(AccountId::derived("airline-1"), "ND1309", 1_591_878_209)
}

struct Fixture {
    consensus: OracleConsensus,
    flights: Flights,
    rng: Seeded,
}

fn fixture() -> Fixture {
    let mut flights = Flights::default();
    flights.0.insert(flight().key());
    Fixture {
        consensus: OracleConsensus::new(&SuretyConfig::default()).unwrap(),
        flights,
        rng: Seeded::new(7),
    }
}

impl Fixture {
    fn register(&mut self, n: usize) -> Vec<AccountId> {
        (0..n)
            .map(|i| {
                let oracle = AccountId::derived(&format!("oracle-{i}"));
                self.consensus
                    .register_oracle(oracle, Amount::ether(1), &self.rng)
                    .unwrap();
                oracle
            })
            .collect()
    }

    /// Register oracles until at least `count` of them hold `index`.
    fn holders(&mut self, index: u8, count: usize) -> Vec<AccountId> {
        let mut serial = self.consensus.oracle_count();
        while self.consensus.oracles_for_index(index).len() < count {
            let oracle = AccountId::derived(&format!("oracle-{serial}"));
            self.consensus
                .register_oracle(oracle, Amount::ether(1), &self.rng)
                .unwrap();
            serial += 1;
        }
        self.consensus.oracles_for_index(index)
    }
}

#[test]
fn registration_requires_fee() {
    let mut f = fixture();
    let oracle = AccountId::derived("oracle");
    let err = f
        .consensus
        .register_oracle(oracle, "0.5 ether".parse().unwrap(), &f.rng)
        .unwrap_err();
    assert_matches!(err, SuretyError::InsufficientFee { .. });
    assert_eq!(
        f.consensus.get_my_indexes(&oracle).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn excess_fee_accepted_and_registration_is_once() {
    let mut f = fixture();
    let oracle = AccountId::derived("oracle");
    let indexes = f
        .consensus
        .register_oracle(oracle, Amount::ether(2), &f.rng)
        .unwrap();
    assert_eq!(f.consensus.get_my_indexes(&oracle).unwrap(), indexes);

    let err = f
        .consensus
        .register_oracle(oracle, Amount::ether(1), &f.rng)
        .unwrap_err();
    assert_matches!(err, SuretyError::OracleAlreadyRegistered { .. });
    assert_eq!(f.consensus.get_my_indexes(&oracle).unwrap(), indexes);
    assert_eq!(f.consensus.oracle_count(), 1);
}

#[test]
fn twenty_oracles_get_in_range_indexes() {
    let mut f = fixture();
    let oracles = f.register(20);
    for oracle in &oracles {
        let indexes = f.consensus.get_my_indexes(oracle).unwrap().as_array();
        assert!(indexes.iter().all(|i| *i < 10));
    }
}

#[test]
fn fetch_requires_registered_flight() {
    let mut f = fixture();
    let unknown = FlightRef::new(AccountId::derived("airline-1"), "XX1", 1);
    let err = f
        .consensus
        .fetch_flight_status(&f.flights, unknown, AccountId::derived("p"))
        .unwrap_err();
    assert_matches!(err, SuretyError::UnknownFlight { .. });
}

#[test]
fn response_outside_assigned_indexes_rejected() {
    let mut f = fixture();
    let oracles = f.register(1);
    let id = f
        .consensus
        .fetch_flight_status(&f.flights, flight(), AccountId::derived("p"))
        .unwrap();
    let assigned = f.consensus.get_my_indexes(&oracles[0]).unwrap();
    let foreign = (0..10u8).find(|i| !assigned.contains(*i)).unwrap();

    let err = f
        .consensus
        .submit_oracle_response(oracles[0], foreign, &flight(), FlightStatus::OnTime)
        .unwrap_err();
    assert_matches!(err, SuretyError::NotAssigned { .. });
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(f.consensus.request(&id).unwrap().total_responses(), 0);
}

#[test]
fn unregistered_oracle_rejected() {
    let mut f = fixture();
    f.consensus
        .fetch_flight_status(&f.flights, flight(), AccountId::derived("p"))
        .unwrap();
    let err = f
        .consensus
        .submit_oracle_response(AccountId::derived("ghost"), 0, &flight(), FlightStatus::OnTime)
        .unwrap_err();
    assert_matches!(err, SuretyError::UnknownOracle { .. });
}

#[test]
fn response_without_request_rejected() {
    let mut f = fixture();
    let oracles = f.register(1);
    let index = f.consensus.get_my_indexes(&oracles[0]).unwrap().as_array()[0];
    let err = f
        .consensus
        .submit_oracle_response(oracles[0], index, &flight(), FlightStatus::OnTime)
        .unwrap_err();
    assert_matches!(err, SuretyError::UnknownRequest { .. });
}

#[test]
fn quorum_finalizes_and_closes_request() {
    let mut f = fixture();
    let id = f
        .consensus
        .fetch_flight_status(&f.flights, flight(), AccountId::derived("p"))
        .unwrap();
    let holders = f.holders(id.index, 4);

    let mut outcomes = Vec::new();
    for oracle in &holders[..3] {
        outcomes.push(
            f.consensus
                .submit_oracle_response(*oracle, id.index, &flight(), FlightStatus::LateAirline)
                .unwrap(),
        );
    }
    assert_eq!(outcomes[0], ResponseOutcome::Recorded { votes: 1 });
    assert_eq!(outcomes[1], ResponseOutcome::Recorded { votes: 2 });
    assert_eq!(
        outcomes[2],
        ResponseOutcome::Finalized {
            status: FlightStatus::LateAirline
        }
    );

    let err = f
        .consensus
        .submit_oracle_response(holders[3], id.index, &flight(), FlightStatus::LateAirline)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RequestClosed);
    assert_eq!(f.consensus.open_requests().count(), 0);
}

#[test]
fn duplicate_response_does_not_count_twice() {
    let mut f = fixture();
    let id = f
        .consensus
        .fetch_flight_status(&f.flights, flight(), AccountId::derived("p"))
        .unwrap();
    let oracle = f.holders(id.index, 1)[0];

    f.consensus
        .submit_oracle_response(oracle, id.index, &flight(), FlightStatus::OnTime)
        .unwrap();
    let err = f
        .consensus
        .submit_oracle_response(oracle, id.index, &flight(), FlightStatus::OnTime)
        .unwrap_err();
    assert_matches!(err, SuretyError::DuplicateResponse { .. });
    assert_eq!(f.consensus.request(&id).unwrap().votes_for(FlightStatus::OnTime), 1);
}

#[test]
fn refetch_onto_open_request_keeps_votes() {
    let mut f = fixture();
    let first = f
        .consensus
        .fetch_flight_status(&f.flights, flight(), AccountId::derived("p"))
        .unwrap();
    let oracle = f.holders(first.index, 1)[0];
    f.consensus
        .submit_oracle_response(oracle, first.index, &flight(), FlightStatus::LateAirline)
        .unwrap();

    for _ in 0..256 {
        let id = f
            .consensus
            .fetch_flight_status(&f.flights, flight(), AccountId::derived("q"))
            .unwrap();
        if id == first {
            let request = f.consensus.request(&id).unwrap();
            assert!(request.is_open());
            assert_eq!(request.votes_for(FlightStatus::LateAirline), 1);
            assert_eq!(request.requester, AccountId::derived("p"));
            return;
        }
    }
    panic!("no fetch was routed back to the open bucket");
}

#[test]
fn refetch_of_finalized_request_starts_fresh_round() {
    let config = SuretyConfig {
        min_responses: 1,
        ..SuretyConfig::default()
    };
    let mut f = fixture();
    f.consensus = OracleConsensus::new(&config).unwrap();

    // Drive fetches until one lands on a bucket that was already finalized.
    let mut finalized = BTreeSet::new();
    for _ in 0..64 {
        let id = f
            .consensus
            .fetch_flight_status(&f.flights, flight(), AccountId::derived("p"))
            .unwrap();
        let request = f.consensus.request(&id).unwrap();
        assert_eq!(request.phase, RequestPhase::Open);
        if finalized.contains(&id.index) {
            assert_eq!(request.total_responses(), 0);
            return;
        }
        let holder = f.holders(id.index, 1)[0];
        f.consensus
            .submit_oracle_response(holder, id.index, &flight(), FlightStatus::OnTime)
            .unwrap();
        finalized.insert(id.index);
    }
    panic!("no fetch was routed to a previously finalized bucket");
}

#[test]
fn zero_quorum_rejected() {
    let config = SuretyConfig {
        min_responses: 0,
        ..SuretyConfig::default()
    };
    assert_matches!(
        OracleConsensus::new(&config),
        Err(SuretyError::Config { .. })
    );
}
