//! Events emitted by committed operations.

use serde::{Deserialize, Serialize};
use vesta_core::address::Address;

/// A state change recorded by a successful operation.
///
/// `Transfer` with `from: None` is a mint; with `to: None` a burn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenEvent {
    Transfer {
        from: Option<Address>,
        to: Option<Address>,
        amount: u64,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: u64,
    },
    Paused {
        by: Address,
    },
    Unpaused {
        by: Address,
    },
    AuthorityTransferred {
        previous: Address,
        new: Address,
    },
    VestingScheduleCreated {
        beneficiary: Address,
        wallet: Address,
        amount: u64,
        start: u64,
        duration: u64,
    },
    TokensReleased {
        beneficiary: Address,
        wallet: Address,
        amount: u64,
    },
}
