//! In-memory fungible ledger.
//!
//! [`MemoryLedger`] keeps balances and allowances in ordered maps so that a
//! serialized ledger is deterministic. Zero balances and zero allowances are
//! pruned, so two ledgers with equal observable state compare equal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::LedgerError;
use crate::traits::Ledger;

/// Balance and allowance bookkeeping held in memory.
///
/// Not thread-safe — callers should wrap in a `Mutex` or `RwLock` if
/// concurrent access is needed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLedger {
    /// Holder → balance. Holders with a zero balance are absent.
    balances: BTreeMap<Address, u64>,
    /// Owner → spender → remaining allowance.
    allowances: BTreeMap<Address, BTreeMap<Address, u64>>,
    /// Sum of all balances.
    total_issued: u64,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of holders with a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    /// Iterate over `(holder, balance)` pairs in address order.
    pub fn iter_balances(&self) -> impl Iterator<Item = (&Address, u64)> {
        self.balances.iter().map(|(a, b)| (a, *b))
    }

    /// Check that the recorded total equals the sum of balances.
    pub fn is_consistent(&self) -> bool {
        self.balances
            .values()
            .try_fold(0u64, |acc, b| acc.checked_add(*b))
            .is_some_and(|sum| sum == self.total_issued)
    }

    fn set_balance(&mut self, holder: &Address, amount: u64) {
        if amount == 0 {
            self.balances.remove(holder);
        } else {
            self.balances.insert(*holder, amount);
        }
    }
}

impl Ledger for MemoryLedger {
    fn balance_of(&self, holder: &Address) -> u64 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn total_issued(&self) -> u64 {
        self.total_issued
    }

    fn credit(&mut self, holder: &Address, amount: u64) -> Result<(), LedgerError> {
        let total = self
            .total_issued
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(holder)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.set_balance(holder, balance);
        self.total_issued = total;
        Ok(())
    }

    fn debit(&mut self, holder: &Address, amount: u64) -> Result<(), LedgerError> {
        let have = self.balance_of(holder);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        self.set_balance(holder, have - amount);
        // total >= any single balance, so this cannot underflow.
        self.total_issued -= amount;
        Ok(())
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: u64) -> Result<(), LedgerError> {
        let have = self.balance_of(from);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        if from == to {
            return Ok(());
        }
        let received = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.set_balance(from, have - amount);
        self.set_balance(to, received);
        Ok(())
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.allowances
            .get(owner)
            .and_then(|by_spender| by_spender.get(spender))
            .copied()
            .unwrap_or(0)
    }

    fn approve(&mut self, owner: &Address, spender: &Address, amount: u64) {
        if amount == 0 {
            if let Some(by_spender) = self.allowances.get_mut(owner) {
                by_spender.remove(spender);
                if by_spender.is_empty() {
                    self.allowances.remove(owner);
                }
            }
        } else {
            self.allowances
                .entry(*owner)
                .or_default()
                .insert(*spender, amount);
        }
    }
}
