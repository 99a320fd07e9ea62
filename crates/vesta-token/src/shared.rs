//! Thread-safe token handle.
//!
//! [`SharedToken`] puts a [`CappedToken`] behind a `parking_lot::RwLock`:
//! mutations take the write lock, so concurrent operations are applied one
//! at a time, while queries share the read lock.

use std::sync::Arc;

use parking_lot::RwLock;
use vesta_core::address::Address;
use vesta_core::ledger::MemoryLedger;
use vesta_core::traits::Ledger;

use crate::error::TokenError;
use crate::registry::{VestingSchedule, WalletId, WalletRef};
use crate::token::CappedToken;

/// Cloneable handle to one token shared between threads.
pub struct SharedToken<L: Ledger = MemoryLedger> {
    inner: Arc<RwLock<CappedToken<L>>>,
}

impl<L: Ledger> Clone for SharedToken<L> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<L: Ledger> SharedToken<L> {
    pub fn new(token: CappedToken<L>) -> Self {
        Self { inner: Arc::new(RwLock::new(token)) }
    }

    /// Run `f` with exclusive access.
    pub fn with<T>(&self, f: impl FnOnce(&mut CappedToken<L>) -> T) -> T {
        f(&mut self.inner.write())
    }

    /// Run `f` with shared read access.
    pub fn view<T>(&self, f: impl FnOnce(&CappedToken<L>) -> T) -> T {
        f(&self.inner.read())
    }

    pub fn mint(&self, caller: &Address, to: &Address, amount: u64) -> Result<(), TokenError> {
        self.inner.write().mint(caller, to, amount)
    }

    pub fn transfer(&self, caller: &Address, to: &Address, amount: u64) -> Result<(), TokenError> {
        self.inner.write().transfer(caller, to, amount)
    }

    pub fn approve(&self, caller: &Address, spender: &Address, amount: u64) -> Result<(), TokenError> {
        self.inner.write().approve(caller, spender, amount)
    }

    pub fn transfer_from(
        &self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), TokenError> {
        self.inner.write().transfer_from(caller, from, to, amount)
    }

    pub fn burn(&self, caller: &Address, amount: u64) -> Result<(), TokenError> {
        self.inner.write().burn(caller, amount)
    }

    pub fn pause(&self, caller: &Address) -> Result<(), TokenError> {
        self.inner.write().pause(caller)
    }

    pub fn unpause(&self, caller: &Address) -> Result<(), TokenError> {
        self.inner.write().unpause(caller)
    }

    pub fn transfer_authority(&self, caller: &Address, new_authority: &Address) -> Result<(), TokenError> {
        self.inner.write().transfer_authority(caller, new_authority)
    }

    pub fn create_vesting_schedule(
        &self,
        caller: &Address,
        beneficiary: &Address,
        amount: u64,
        start: u64,
        duration: u64,
    ) -> Result<WalletRef, TokenError> {
        self.inner
            .write()
            .create_vesting_schedule(caller, beneficiary, amount, start, duration)
    }

    pub fn release_vested_tokens(&self, beneficiary: &Address) -> Result<u64, TokenError> {
        self.inner.write().release_vested_tokens(beneficiary)
    }

    pub fn release_wallet(&self, id: WalletId) -> Result<u64, TokenError> {
        self.inner.write().release_wallet(id)
    }

    pub fn balance_of(&self, holder: &Address) -> u64 {
        self.inner.read().balance_of(holder)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.inner.read().allowance(owner, spender)
    }

    pub fn is_paused(&self) -> bool {
        self.inner.read().is_paused()
    }

    pub fn total_issued(&self) -> u64 {
        self.inner.read().total_issued()
    }

    pub fn vesting_schedule(&self, beneficiary: &Address) -> Option<VestingSchedule> {
        self.inner.read().vesting_schedule(beneficiary)
    }
}
