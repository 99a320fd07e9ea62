//! Linear-release vesting wallet.
//!
//! A [`VestingWallet`] custodies funds for exactly one beneficiary. Its funds
//! live in the ledger under the wallet's own [`Address`]; the wallet itself
//! only tracks the schedule `(start, duration)` and how much it has already
//! released.
//!
//! The allocation base at any moment is `balance + released`, so the curve
//! covers everything the wallet has ever held:
//!
//! ```text
//! vested(t) = 0                                   t <= start
//!           = total * (t - start) / duration      start < t < start + duration
//!           = total                               t >= start + duration
//! releasable(t) = vested(t) - released
//! ```
//!
//! Division truncates. Because the curve reaches exactly `total` at the end
//! of the schedule, the last release always drains any truncation residue.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::WalletError;

/// Escrow releasing funds to one beneficiary on a linear schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingWallet {
    /// Ledger address holding the wallet's funds.
    address: Address,
    /// Recipient of every release.
    beneficiary: Address,
    /// Unix timestamp at which vesting begins.
    start: u64,
    /// Vesting length in seconds.
    duration: u64,
    /// Amount already paid out to the beneficiary.
    released: u64,
}

impl VestingWallet {
    /// Create a wallet for `beneficiary` at its derived address.
    pub fn new(beneficiary: Address, start: u64, duration: u64) -> Self {
        Self {
            address: Address::vesting_wallet(&beneficiary),
            beneficiary,
            start,
            duration,
            released: 0,
        }
    }

    /// Ledger address of this wallet.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn beneficiary(&self) -> Address {
        self.beneficiary
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Timestamp at which everything is vested, saturating at `u64::MAX`.
    pub fn end(&self) -> u64 {
        self.start.saturating_add(self.duration)
    }

    /// Amount already released to the beneficiary.
    pub fn released(&self) -> u64 {
        self.released
    }

    /// Total allocation given the wallet's current ledger balance.
    ///
    /// Includes any deposit made to the wallet address, before or after the
    /// schedule was created.
    pub fn total_allocation(&self, balance: u64) -> Result<u64, WalletError> {
        balance.checked_add(self.released).ok_or(WalletError::Overflow)
    }

    /// Amount of `total_allocation` vested at `timestamp`.
    ///
    /// Uses a u128 intermediate so `total * elapsed` cannot overflow.
    pub fn vested_amount(&self, total_allocation: u64, timestamp: u64) -> u64 {
        if timestamp <= self.start {
            return 0;
        }
        if self.duration == 0 || timestamp >= self.end() {
            return total_allocation;
        }
        let elapsed = (timestamp - self.start) as u128;
        let vested = total_allocation as u128 * elapsed / self.duration as u128;
        // elapsed < duration, so vested < total_allocation.
        vested as u64
    }

    /// Vested but not yet released amount at `now`.
    pub fn releasable(&self, balance: u64, now: u64) -> Result<u64, WalletError> {
        let total = self.total_allocation(balance)?;
        Ok(self.vested_amount(total, now).saturating_sub(self.released))
    }

    /// Advance the released counter by everything releasable at `now`.
    ///
    /// Returns the amount the caller must now move from [`address`](Self::address)
    /// to the beneficiary. Returns 0 (and changes nothing) when nothing is
    /// releasable.
    pub fn record_release(&mut self, balance: u64, now: u64) -> Result<u64, WalletError> {
        let amount = self.releasable(balance, now)?;
        self.released = self.released.checked_add(amount).ok_or(WalletError::Overflow)?;
        Ok(amount)
    }

    /// Undo a previous [`record_release`](Self::record_release) of `amount`.
    pub fn revert_release(&mut self, amount: u64) -> Result<(), WalletError> {
        self.released = self
            .released
            .checked_sub(amount)
            .ok_or(WalletError::RevertExceedsReleased { amount, released: self.released })?;
        Ok(())
    }
}
