//! Supply cap guard.
//!
//! The cap bounds the outstanding issued amount: burned units free up room
//! that may be minted again.

use crate::error::TokenError;

/// Immutable issuance ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SupplyCap {
    max_supply: u64,
}

impl SupplyCap {
    /// Create a guard. A zero cap is rejected.
    pub fn new(max_supply: u64) -> Result<Self, TokenError> {
        if max_supply == 0 {
            return Err(TokenError::InvalidConfig("max_supply must be greater than zero".into()));
        }
        Ok(Self { max_supply })
    }

    pub fn max_supply(&self) -> u64 {
        self.max_supply
    }

    /// Amount that can still be minted given `issued`.
    pub fn headroom(&self, issued: u64) -> u64 {
        self.max_supply.saturating_sub(issued)
    }

    /// Reject a mint of `amount` on top of `issued` that would pass the cap.
    ///
    /// An overflowing sum is reported the same way.
    pub fn check(&self, issued: u64, amount: u64) -> Result<(), TokenError> {
        match issued.checked_add(amount) {
            Some(after) if after <= self.max_supply => Ok(()),
            _ => Err(TokenError::SupplyExceeded {
                requested: amount,
                issued,
                cap: self.max_supply,
            }),
        }
    }
}
