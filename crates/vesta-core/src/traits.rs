//! Trait interfaces for the Vesta primitives.
//!
//! These traits define the contracts between crates:
//! - [`Ledger`] — fungible balance bookkeeping ([`MemoryLedger`](crate::ledger::MemoryLedger) implements)
//! - [`Clock`] — source of the current Unix time ([`clock`](crate::clock) implements)

use crate::address::Address;
use crate::error::LedgerError;

/// Fungible balance and issuance bookkeeping.
///
/// The ledger performs no authorization, supply or pause checks: callers are
/// expected to enforce policy before invoking a mutating method. Mutations
/// either succeed completely or leave the ledger untouched.
pub trait Ledger: Send + Sync {
    /// Balance held by `holder` in base units. Unknown holders hold zero.
    fn balance_of(&self, holder: &Address) -> u64;

    /// Sum of all balances.
    fn total_issued(&self) -> u64;

    /// Create `amount` new units in `holder`'s balance.
    ///
    /// Increases [`total_issued`](Self::total_issued) by exactly `amount`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Overflow`] if the balance or total would overflow
    fn credit(&mut self, holder: &Address, amount: u64) -> Result<(), LedgerError>;

    /// Destroy `amount` units from `holder`'s balance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientBalance`] if `holder` holds less than `amount`
    fn debit(&mut self, holder: &Address, amount: u64) -> Result<(), LedgerError>;

    /// Move `amount` units from `from` to `to`. Total issued is unchanged.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientBalance`] if `from` holds less than `amount`
    /// - [`LedgerError::Overflow`] if the recipient balance would overflow
    fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), LedgerError>;

    /// Remaining amount `spender` may move out of `owner`'s balance.
    fn allowance(&self, owner: &Address, spender: &Address) -> u64;

    /// Set `spender`'s allowance over `owner`'s balance, replacing any previous value.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: u64);

    /// Consume `amount` of `spender`'s allowance over `owner`'s balance.
    ///
    /// An allowance of `u64::MAX` is treated as unlimited and never decreases.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InsufficientAllowance`] if the allowance is below `amount`
    fn spend_allowance(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let current = self.allowance(owner, spender);
        if current == u64::MAX {
            return Ok(());
        }
        if current < amount {
            return Err(LedgerError::InsufficientAllowance { have: current, need: amount });
        }
        self.approve(owner, spender, current - amount);
        Ok(())
    }
}

/// Source of the current time in Unix seconds.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in seconds.
    fn now(&self) -> u64;
}
