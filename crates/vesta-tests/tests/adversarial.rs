//! Adversarial property-based test suite for Vesta.
//!
//! These tests throw randomized operation sequences at a token and check
//! that its invariants hold after every step. Each property uses 256 cases
//! with proptest shrinking to produce minimal failing sequences.
//!
//! Properties tested:
//! - Supply cap: total issued never exceeds `max_supply`
//! - Ledger consistency: total issued equals the sum of balances
//! - Vesting bounds: `released <= total_allocated`, `released` never decreases
//! - Wallet custody: an allocation never shrinks, since only releases debit it
//! - Atomicity: a failed operation leaves state and event log untouched
//! - Duplicate schedules are always rejected
//! - Pause gating of every balance movement
//! - Release idempotence at a fixed instant

use std::collections::HashMap;

use proptest::prelude::*;
use vesta_core::address::Address;
use vesta_core::clock::ManualClock;
use vesta_core::traits::Clock;
use vesta_token::{CappedToken, TokenError};
use vesta_tests::helpers::*;

// ---------------------------------------------------------------------------
// Operation model
// ---------------------------------------------------------------------------

/// Seed 0 maps to the zero address so invalid-address paths get exercised.
fn who(seed: u8) -> Address {
    if seed == 0 { Address::ZERO } else { addr(seed) }
}

#[derive(Clone, Debug)]
enum Op {
    Mint { as_authority: bool, to: u8, amount: u64 },
    Transfer { from: u8, to: u8, amount: u64 },
    Approve { owner: u8, spender: u8, amount: u64 },
    TransferFrom { spender: u8, from: u8, to: u8, amount: u64 },
    Burn { from: u8, amount: u64 },
    Create { beneficiary: u8, amount: u64, start_offset: u64, duration: u64 },
    Release { beneficiary: u8 },
    DrainWallet { beneficiary: u8, amount: u64 },
    Pause,
    Unpause,
    Advance { secs: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), 0u8..6, 0u64..400)
            .prop_map(|(as_authority, to, amount)| Op::Mint { as_authority, to, amount }),
        (1u8..6, 0u8..6, 0u64..200).prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
        (1u8..6, 0u8..6, 0u64..200)
            .prop_map(|(owner, spender, amount)| Op::Approve { owner, spender, amount }),
        (1u8..6, 1u8..6, 0u8..6, 0u64..200)
            .prop_map(|(spender, from, to, amount)| Op::TransferFrom { spender, from, to, amount }),
        (1u8..6, 0u64..200).prop_map(|(from, amount)| Op::Burn { from, amount }),
        (0u8..6, 0u64..400, 0u64..200, 0u64..200).prop_map(|(beneficiary, amount, start_offset, duration)| {
            Op::Create { beneficiary, amount, start_offset, duration }
        }),
        (0u8..6).prop_map(|beneficiary| Op::Release { beneficiary }),
        (1u8..6, 0u64..200).prop_map(|(beneficiary, amount)| Op::DrainWallet { beneficiary, amount }),
        Just(Op::Pause),
        Just(Op::Unpause),
        (0u64..80).prop_map(|secs| Op::Advance { secs }),
    ]
}

fn apply(t: &mut CappedToken, clock: &ManualClock, op: &Op) -> Result<(), TokenError> {
    match *op {
        Op::Mint { as_authority, to, amount } => {
            let caller = if as_authority { AUTHORITY } else { addr(1) };
            t.mint(&caller, &who(to), amount)
        }
        Op::Transfer { from, to, amount } => t.transfer(&who(from), &who(to), amount),
        Op::Approve { owner, spender, amount } => t.approve(&who(owner), &who(spender), amount),
        Op::TransferFrom { spender, from, to, amount } => {
            t.transfer_from(&who(spender), &who(from), &who(to), amount)
        }
        Op::Burn { from, amount } => t.burn(&who(from), amount),
        Op::Create { beneficiary, amount, start_offset, duration } => {
            // Starts range from 100s in the past to 100s in the future.
            let start = (clock.now() + start_offset).saturating_sub(100);
            t.create_vesting_schedule(&AUTHORITY, &who(beneficiary), amount, start, duration)
                .map(|_| ())
        }
        Op::Release { beneficiary } => t.release_vested_tokens(&who(beneficiary)).map(|_| ()),
        Op::DrainWallet { beneficiary, amount } => {
            let wallet = Address::vesting_wallet(&who(beneficiary));
            t.transfer(&wallet, &addr(1), amount)
        }
        Op::Pause => t.pause(&AUTHORITY),
        Op::Unpause => t.unpause(&AUTHORITY),
        Op::Advance { secs } => {
            clock.advance(secs);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Invariants under random sequences
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn invariants_hold_under_random_ops(
        cap in 1u64..2_000,
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let (mut t, clock) = token(cap);
        let mut released_seen: HashMap<Address, u64> = HashMap::new();
        let mut allocated_seen: HashMap<Address, u64> = HashMap::new();

        for op in &ops {
            let before = t.snapshot();
            let events_before = t.events().len();

            let result = apply(&mut t, &clock, op);

            if let Op::DrainWallet { beneficiary, .. } = *op {
                if t.vesting_wallet(&who(beneficiary)).is_some() {
                    let is_custody = matches!(result, Err(TokenError::WalletCustody(_)));
                    prop_assert!(is_custody, "wallet debited outside a release: {:?}", result);
                }
            }

            if let Err(err) = &result {
                prop_assert_eq!(&t.snapshot(), &before, "failed {:?} ({}) changed state", op, err);
                prop_assert_eq!(t.events().len(), events_before, "failed {:?} emitted events", op);
            }

            prop_assert!(t.total_issued() <= cap);
            prop_assert_eq!(t.total_issued(), sum_of_balances(&t));

            for wallet in t.registry().wallets() {
                let schedule = t.vesting_schedule(&wallet.beneficiary()).unwrap();
                prop_assert!(schedule.released <= schedule.total_allocated);
                let seen = released_seen.entry(wallet.beneficiary()).or_insert(0);
                prop_assert!(schedule.released >= *seen, "released went backwards");
                *seen = schedule.released;
                let allocated = allocated_seen.entry(wallet.beneficiary()).or_insert(0);
                prop_assert!(schedule.total_allocated >= *allocated, "allocation shrank");
                *allocated = schedule.total_allocated;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Supply cap
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn mints_never_exceed_cap(
        cap in 1u64..10_000,
        amounts in prop::collection::vec(0u64..5_000, 1..30),
    ) {
        let (mut t, _) = token(cap);
        let mut accepted = 0u64;
        for amount in amounts {
            match t.mint(&AUTHORITY, &addr(1), amount) {
                Ok(()) => accepted += amount,
                Err(TokenError::SupplyExceeded { requested, issued, cap: c }) => {
                    prop_assert_eq!(requested, amount);
                    prop_assert_eq!(issued, accepted);
                    prop_assert_eq!(c, cap);
                    prop_assert!(issued + requested > cap);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
        prop_assert_eq!(t.total_issued(), accepted);
        prop_assert!(accepted <= cap);
    }

    #[test]
    fn cap_applies_to_vesting_funding(
        minted in 0u64..1_000,
        allocation in 1u64..1_000,
    ) {
        let (mut t, _) = token(1_000);
        t.mint(&AUTHORITY, &addr(1), minted).unwrap();
        let result = t.create_vesting_schedule(&AUTHORITY, &addr(2), allocation, T0, 10);
        if minted + allocation <= 1_000 {
            prop_assert!(result.is_ok());
        } else {
            let is_supply_exceeded = matches!(result, Err(TokenError::SupplyExceeded { .. }));
            prop_assert!(is_supply_exceeded);
            prop_assert!(t.vesting_wallet(&addr(2)).is_none());
        }
    }
}

// ---------------------------------------------------------------------------
// Vesting curve
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn releases_sum_to_allocation(
        allocation in 1u64..1_000_000_000,
        duration in 1u64..100_000,
        steps in prop::collection::vec(0u64..20_000, 0..20),
    ) {
        let (mut t, clock) = token(u64::MAX);
        let b = addr(2);
        t.create_vesting_schedule(&AUTHORITY, &b, allocation, T0, duration).unwrap();

        let mut total = 0u64;
        for step in steps {
            clock.advance(step);
            let before = t.releasable_amount(&b).unwrap();
            let got = t.release_vested_tokens(&b).unwrap();
            prop_assert_eq!(got, before);
            total += got;
            prop_assert!(total <= allocation);
        }
        clock.set(T0 + duration);
        total += t.release_vested_tokens(&b).unwrap();
        prop_assert_eq!(total, allocation);
        prop_assert_eq!(t.balance_of(&b), allocation);
    }

    #[test]
    fn release_is_idempotent_at_fixed_instant(
        allocation in 1u64..1_000_000,
        duration in 1u64..10_000,
        elapsed in 0u64..20_000,
    ) {
        let (mut t, clock) = token(u64::MAX);
        let b = addr(2);
        t.create_vesting_schedule(&AUTHORITY, &b, allocation, T0, duration).unwrap();
        clock.set(T0 + elapsed);
        t.release_vested_tokens(&b).unwrap();
        let after_first = t.snapshot();
        prop_assert_eq!(t.release_vested_tokens(&b).unwrap(), 0);
        prop_assert_eq!(t.snapshot(), after_first);
    }

    #[test]
    fn vested_amount_is_monotonic(
        allocation in 1u64..u64::MAX / 2,
        duration in 1u64..1_000_000,
        a in 0u64..2_000_000,
        b in 0u64..2_000_000,
    ) {
        let (mut t, _) = token(u64::MAX);
        let ben = addr(2);
        t.create_vesting_schedule(&AUTHORITY, &ben, allocation, T0, duration).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let v_lo = t.vested_amount(&ben, T0 + lo).unwrap();
        let v_hi = t.vested_amount(&ben, T0 + hi).unwrap();
        prop_assert!(v_lo <= v_hi);
        prop_assert!(v_hi <= allocation);
    }
}

// ---------------------------------------------------------------------------
// Registry and gate
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn duplicate_create_always_rejected(
        first in 1u64..1_000,
        second in 0u64..1_000,
        duration in 0u64..1_000,
        start in 0u64..u64::MAX / 2,
    ) {
        let (mut t, _) = token(u64::MAX);
        let b = addr(2);
        t.create_vesting_schedule(&AUTHORITY, &b, first, T0, 100).unwrap();
        let before = t.snapshot();
        prop_assert_eq!(
            t.create_vesting_schedule(&AUTHORITY, &b, second, start, duration),
            Err(TokenError::ScheduleAlreadyExists(b))
        );
        prop_assert_eq!(t.snapshot(), before);
    }

    #[test]
    fn paused_token_moves_nothing(
        amount in 1u64..100,
        elapsed in 1u64..1_000,
    ) {
        let (mut t, clock) = token(10_000);
        t.mint(&AUTHORITY, &addr(1), 1_000).unwrap();
        t.create_vesting_schedule(&AUTHORITY, &addr(2), 1_000, T0, 100).unwrap();
        clock.advance(elapsed);
        t.pause(&AUTHORITY).unwrap();
        let before = t.snapshot();

        prop_assert_eq!(t.transfer(&addr(1), &addr(3), amount), Err(TokenError::TransfersPaused));
        prop_assert_eq!(t.burn(&addr(1), amount), Err(TokenError::TransfersPaused));
        prop_assert_eq!(t.mint(&AUTHORITY, &addr(1), amount), Err(TokenError::TransfersPaused));
        prop_assert_eq!(t.release_vested_tokens(&addr(2)), Err(TokenError::TransfersPaused));
        prop_assert_eq!(t.snapshot(), before);
    }
}
