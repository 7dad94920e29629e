//! Multi-party admission tests.

use proptest::prelude::*;
use surety_core::{AccountId, AirlineDirectory, Amount, SuretyConfig};
use surety_registry::{AirlineRegistry, RegistrationOutcome};

fn airline(n: u8) -> AccountId {
    AccountId::from_bytes([n; 20])
}

/// Registry with `n` registered and funded airlines, ids `1..=n`.
fn registry_with(n: u8) -> AirlineRegistry {
    let mut reg = AirlineRegistry::new(&SuretyConfig::default(), airline(1));
    reg.fund(airline(1), Amount::ether(10)).unwrap();
    for candidate in 2..=n {
        for voter in 1..candidate {
            match reg.register_airline(airline(candidate), airline(voter)).unwrap() {
                RegistrationOutcome::Registered => break,
                RegistrationOutcome::VoteRecorded { .. } => continue,
            }
        }
        reg.fund(airline(candidate), Amount::ether(10)).unwrap();
    }
    assert_eq!(reg.registered_count(), usize::from(n));
    reg
}

#[test]
fn scenario_fifth_airline_waits_for_second_voter() {
    // A funds, registers B, C, D; D funds and nominates E; E waits for a
    // second funded airline.
    let mut reg = AirlineRegistry::new(&SuretyConfig::default(), airline(1));
    reg.fund(airline(1), Amount::ether(10)).unwrap();
    for n in 2..=4 {
        assert_eq!(
            reg.register_airline(airline(n), airline(1)).unwrap(),
            RegistrationOutcome::Registered
        );
    }
    reg.fund(airline(4), Amount::ether(10)).unwrap();

    reg.register_airline(airline(5), airline(4)).unwrap();
    assert!(!reg.is_airline_registered(&airline(5)));

    reg.register_airline(airline(5), airline(1)).unwrap();
    assert!(reg.is_airline_registered(&airline(5)));
}

#[test]
fn unfunded_member_vote_is_rejected() {
    let mut reg = AirlineRegistry::new(&SuretyConfig::default(), airline(1));
    reg.fund(airline(1), Amount::ether(10)).unwrap();
    for n in 2..=4 {
        reg.register_airline(airline(n), airline(1)).unwrap();
    }
    reg.register_airline(airline(5), airline(1)).unwrap();

    // Airline 3 is registered but never funded.
    assert!(reg.register_airline(airline(5), airline(3)).is_err());
    assert!(!reg.is_airline_registered(&airline(5)));
    assert_eq!(reg.pending_votes(&airline(5)), vec![airline(1)]);
}

#[test]
fn threshold_grows_with_membership() {
    let reg = registry_with(4);
    assert_eq!(reg.required_votes(), 2);
    let reg = registry_with(7);
    assert_eq!(reg.required_votes(), 4);
    let reg = registry_with(8);
    assert_eq!(reg.required_votes(), 4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_admitted_iff_majority(members in 4u8..12, voters in 1u8..12) {
        let mut reg = registry_with(members);
        let candidate = airline(200);
        let voters = voters.min(members);
        let required = usize::from(members).div_ceil(2);

        let mut registered = false;
        for voter in 1..=voters {
            if let RegistrationOutcome::Registered =
                reg.register_airline(candidate, airline(voter)).unwrap()
            {
                registered = true;
                break;
            }
        }

        prop_assert_eq!(registered, usize::from(voters) >= required);
        prop_assert_eq!(reg.is_airline_registered(&candidate), registered);
    }

    #[test]
    fn prop_below_threshold_is_immediate(extra in 1u8..3) {
        let mut reg = AirlineRegistry::new(&SuretyConfig::default(), airline(1));
        reg.fund(airline(1), Amount::ether(10)).unwrap();
        for n in 0..extra {
            let outcome = reg.register_airline(airline(10 + n), airline(1)).unwrap();
            prop_assert_eq!(outcome, RegistrationOutcome::Registered);
        }
    }
}
