//! Beneficiary → vesting wallet registry.
//!
//! Wallets live in an append-only arena and are addressed by a stable
//! [`WalletId`]. The registry owns whether a beneficiary has a wallet; the
//! wallet itself custodies funds under its own ledger address and is never
//! removed once registered.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use vesta_core::address::Address;
use vesta_core::escrow::VestingWallet;

use crate::error::TokenError;

/// Index of a wallet in the registry arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(pub u32);

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle returned to callers: arena id plus the wallet's ledger address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletRef {
    pub id: WalletId,
    pub address: Address,
}

/// Point-in-time view of one beneficiary's schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub beneficiary: Address,
    pub wallet: WalletRef,
    /// `balance + released` of the wallet.
    pub total_allocated: u64,
    pub start: u64,
    pub duration: u64,
    pub released: u64,
}

/// One-wallet-per-beneficiary registry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VestingRegistry {
    /// Arena; `WalletId(i)` is `wallets[i]`.
    wallets: Vec<VestingWallet>,
    /// Beneficiary → arena index.
    by_beneficiary: HashMap<Address, WalletId>,
    /// Wallet ledger address → arena index.
    by_address: HashMap<Address, WalletId>,
}

impl VestingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from a persisted arena.
    ///
    /// # Errors
    ///
    /// - [`TokenError::ScheduleAlreadyExists`] if two wallets share a beneficiary
    /// - [`TokenError::ArithmeticOverflow`] if the arena exceeds `u32::MAX` entries
    pub fn from_wallets(wallets: Vec<VestingWallet>) -> Result<Self, TokenError> {
        let mut registry = Self::new();
        for wallet in wallets {
            registry.register(wallet)?;
        }
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn contains(&self, beneficiary: &Address) -> bool {
        self.by_beneficiary.contains_key(beneficiary)
    }

    /// Whether `address` is the ledger address of a registered wallet.
    pub fn is_wallet_address(&self, address: &Address) -> bool {
        self.by_address.contains_key(address)
    }

    /// Handle for `beneficiary`'s wallet, if any.
    pub fn lookup(&self, beneficiary: &Address) -> Option<WalletRef> {
        let id = *self.by_beneficiary.get(beneficiary)?;
        let wallet = self.wallet(id)?;
        Some(WalletRef { id, address: wallet.address() })
    }

    pub fn wallet(&self, id: WalletId) -> Option<&VestingWallet> {
        self.wallets.get(id.0 as usize)
    }

    pub(crate) fn wallet_mut(&mut self, id: WalletId) -> Option<&mut VestingWallet> {
        self.wallets.get_mut(id.0 as usize)
    }

    /// Wallets in creation order.
    pub fn wallets(&self) -> &[VestingWallet] {
        &self.wallets
    }

    /// Append `wallet` to the arena and index it by beneficiary.
    ///
    /// # Errors
    ///
    /// - [`TokenError::ScheduleAlreadyExists`] if the beneficiary already has a wallet
    /// - [`TokenError::ArithmeticOverflow`] if no more ids are available
    pub fn register(&mut self, wallet: VestingWallet) -> Result<WalletRef, TokenError> {
        let beneficiary = wallet.beneficiary();
        if self.contains(&beneficiary) {
            return Err(TokenError::ScheduleAlreadyExists(beneficiary));
        }
        let id = WalletId(u32::try_from(self.wallets.len()).map_err(|_| TokenError::ArithmeticOverflow)?);
        let address = wallet.address();
        self.wallets.push(wallet);
        self.by_beneficiary.insert(beneficiary, id);
        self.by_address.insert(address, id);
        Ok(WalletRef { id, address })
    }

    /// Remove the most recent registration if it belongs to `beneficiary`.
    ///
    /// Only used to roll back a registration inside a failed operation.
    pub(crate) fn unregister_last(&mut self, beneficiary: &Address) -> Option<VestingWallet> {
        if self.wallets.last()?.beneficiary() != *beneficiary {
            return None;
        }
        self.by_beneficiary.remove(beneficiary);
        let wallet = self.wallets.pop()?;
        self.by_address.remove(&wallet.address());
        Some(wallet)
    }
}
