//! End-to-end airline, flight and insurance flows through the facade.

use assert_matches::assert_matches;
use surety_app::RegistrationOutcome;
use surety_core::{Amount, ErrorKind, FlightStatus, SuretyError, SuretyEvent};
use surety_testkit::*;

#[test]
fn airline_funding() {
    let h = SuretyHarness::new(1);
    assert!(h.surety.is_airline_registered(&h.first_airline));
    assert!(!h.surety.is_airline_funded(&h.first_airline));

    let err = h
        .surety
        .fund(h.first_airline, Amount::ether(5))
        .unwrap_err();
    assert_matches!(err, SuretyError::InsufficientFunds { .. });
    assert!(!h.surety.is_airline_funded(&h.first_airline));

    h.fund_first_airline();
    assert!(h.surety.is_airline_funded(&h.first_airline));
    assert_eq!(h.surety.reserve(), Amount::ether(10));
}

#[test]
fn four_airlines_then_multiparty_consensus() {
    let h = SuretyHarness::new(1);
    h.fund_first_airline();
    let first = h.first_airline;

    for n in 2..=4 {
        assert_eq!(
            h.surety.register_airline(airline(n), first).unwrap(),
            RegistrationOutcome::Registered
        );
        assert!(h.surety.is_airline_registered(&airline(n)));
    }
    assert_eq!(h.surety.airline_count(), 4);

    let outcome = h.surety.register_airline(airline(5), first).unwrap();
    assert_eq!(
        outcome,
        RegistrationOutcome::VoteRecorded {
            votes: 1,
            required: 2
        }
    );
    assert!(!h.surety.is_airline_registered(&airline(5)));
    assert_eq!(h.surety.pending_votes(&airline(5)), vec![first]);

    let err = h.surety.register_airline(airline(5), first).unwrap_err();
    assert_matches!(err, SuretyError::DuplicateVote { .. });

    // Registered but unfunded airlines cannot vote.
    let err = h.surety.register_airline(airline(5), airline(4)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    h.surety.fund(airline(4), Amount::ether(10)).unwrap();
    assert_eq!(
        h.surety.register_airline(airline(5), airline(4)).unwrap(),
        RegistrationOutcome::Registered
    );
    assert!(h.surety.is_airline_registered(&airline(5)));
    assert_eq!(h.surety.airline_count(), 5);
    assert!(h.surety.pending_votes(&airline(5)).is_empty());

    let err = h.surety.register_airline(airline(5), first).unwrap_err();
    assert_matches!(err, SuretyError::AlreadyRegistered { .. });
}

#[test]
fn unregistered_caller_cannot_register_airlines() {
    let h = SuretyHarness::new(1);
    let err = h
        .surety
        .register_airline(airline(2), airline(9))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert!(!h.surety.is_airline_registered(&airline(2)));
}

#[test]
fn insurance_purchase_bounds() {
    let h = SuretyHarness::new(1);
    let flight = h.registered_flight("AC110");
    let key = flight.key();

    h.surety
        .buy(&flight, passenger(1), Amount::ether(1))
        .unwrap();
    assert!(h.surety.is_passenger_insured(&passenger(1), &key));

    let err = h
        .surety
        .buy(&flight, passenger(2), "1.1 ether".parse().unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidAmount);
    assert!(!h.surety.is_passenger_insured(&passenger(2), &key));

    let err = h.surety.buy(&flight, passenger(2), Amount::ZERO).unwrap_err();
    assert_matches!(err, SuretyError::InvalidPremium { .. });

    let err = h
        .surety
        .buy(&flight, passenger(1), Amount::gwei(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateEntry);
}

#[test]
fn buying_for_unknown_flight_fails() {
    let h = SuretyHarness::new(1);
    h.fund_first_airline();
    let err = h
        .surety
        .buy(&h.flight("ZZ999"), passenger(1), Amount::ether(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn flight_registration_rules() {
    let h = SuretyHarness::new(1);
    let flight = h.flight("AC110");

    let err = h
        .surety
        .register_flight(flight.clone(), h.first_airline)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    h.fund_first_airline();
    let err = h
        .surety
        .register_flight(flight.clone(), passenger(1))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let key = h
        .surety
        .register_flight(flight.clone(), h.first_airline)
        .unwrap();
    assert_eq!(key, flight.key());
    assert_eq!(h.surety.flight_status(&key), Some(FlightStatus::Unknown));

    let err = h
        .surety
        .register_flight(flight, h.first_airline)
        .unwrap_err();
    assert_matches!(err, SuretyError::DuplicateFlight { .. });
}

#[test]
fn insured_passenger_payout() {
    let h = SuretyHarness::new(1);
    let flight = h.registered_flight("AC110");
    h.surety.deposit(owner(), Amount::ether(10)).unwrap();
    h.surety
        .buy(&flight, passenger(1), Amount::ether(1))
        .unwrap();

    let err = h.surety.pay(&flight, passenger(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotInsured);

    let token = h
        .surety
        .set_authorized_caller(h.owner, h.owner)
        .unwrap();
    h.surety.credit_insurees(&token, &flight, 150).unwrap();
    h.surety
        .set_authorized_caller(h.owner, h.surety.app_account())
        .unwrap();

    let paid = h.surety.pay(&flight, passenger(1)).unwrap();
    assert_eq!(paid, "1.5 ether".parse().unwrap());
    assert_eq!(h.transfers.received(&passenger(1)), paid);
    assert_eq!(h.surety.credited_amount(&passenger(1), &flight.key()), Amount::ZERO);

    let err = h.surety.pay(&flight, passenger(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotInsured);
    assert_eq!(h.transfers.sent().len(), 1);
}

#[test]
fn departure_guard() {
    let h = SuretyHarness::builder(1)
        .config(surety_core::SuretyConfig {
            reject_departed_flights: true,
            ..Default::default()
        })
        .build();
    let flight = h.registered_flight("AC110");

    h.surety
        .buy(&flight, passenger(1), Amount::ether(1))
        .unwrap();

    h.clock.set(FLIGHT_TIMESTAMP);
    let err = h
        .surety
        .buy(&flight, passenger(2), Amount::ether(1))
        .unwrap_err();
    assert_matches!(err, SuretyError::FlightDeparted { .. });
}

#[test]
fn events_follow_committed_operations() {
    let h = SuretyHarness::new(1);
    let mut events = h.surety.subscribe();

    assert!(h.surety.fund(h.first_airline, Amount::ether(1)).is_err());
    h.fund_first_airline();
    let flight = h.registered_flight("AC110");

    assert_matches!(
        events.try_recv(),
        Ok(SuretyEvent::AirlineFunded { airline, .. }) if airline == h.first_airline
    );
    assert_matches!(
        events.try_recv(),
        Ok(SuretyEvent::FlightRegistered { key, .. }) if key == flight.key()
    );
    assert!(events.try_recv().is_err());
}

#[test]
fn concurrent_events_arrive_in_commit_order() {
    const THREADS: u128 = 8;
    const ROUNDS: u128 = 5;

    let h = SuretyHarness::new(1);
    let mut events = h.surety.subscribe();
    let airline = h.first_airline;

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            let surety = h.surety.clone();
            scope.spawn(move || {
                for _ in 0..ROUNDS {
                    surety.fund(airline, Amount::ether(10)).unwrap();
                }
            });
        }
    });

    let totals: Vec<u128> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|event| match event {
            SuretyEvent::AirlineFunded { total, .. } => total.wei(),
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    let expected: Vec<u128> = (1..=THREADS * ROUNDS)
        .map(|n| Amount::ether(10).wei() * n)
        .collect();
    assert_eq!(totals, expected);
}
