//! Named test accounts.

use surety_core::AccountId;

/// Contract owner
pub fn owner() -> AccountId {
    AccountId::derived("owner")
}

/// The n-th airline, 1-based. `airline(1)` is the genesis airline.
pub fn airline(n: usize) -> AccountId {
    AccountId::derived(&format!("airline-{n}"))
}

/// The n-th passenger
pub fn passenger(n: usize) -> AccountId {
    AccountId::derived(&format!("passenger-{n}"))
}

/// The n-th oracle, 0-based
pub fn oracle(n: usize) -> AccountId {
    AccountId::derived(&format!("oracle-{n}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounts_are_distinct() {
        assert_ne!(airline(1), airline(2));
        assert_ne!(airline(1), passenger(1));
        assert_ne!(oracle(1), passenger(1));
        assert_eq!(owner(), owner());
    }
}
