//! Shared test helpers for E2E and property tests.

use std::sync::Arc;

use vesta_core::address::Address;
use vesta_core::clock::ManualClock;
use vesta_token::{CappedToken, TokenConfig};

/// Fixed start time used by most scenarios.
pub const T0: u64 = 1_700_000_000;

/// Authority of every token built by [`token`].
pub const AUTHORITY: Address = Address([0xA0; 32]);

/// Simple address from a seed byte.
pub fn addr(seed: u8) -> Address {
    Address([seed; 32])
}

/// Token with cap `max_supply` and a manual clock frozen at [`T0`].
pub fn token(max_supply: u64) -> (CappedToken, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(T0));
    let config = TokenConfig::new("Test", "TST", max_supply, AUTHORITY);
    let token = CappedToken::new(config, clock.clone()).expect("valid test config");
    (token, clock)
}

/// Sum of every ledger balance, recomputed from scratch.
pub fn sum_of_balances(token: &CappedToken) -> u64 {
    token.ledger().iter_balances().map(|(_, b)| b).sum()
}
