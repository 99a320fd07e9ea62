//! Token operation errors.
//!
//! Every rejected precondition has its own variant; ledger failures are
//! mapped onto token-level kinds instead of being wrapped.

use thiserror::Error;
use vesta_core::address::Address;
use vesta_core::error::{LedgerError, WalletError};

use crate::registry::WalletId;

/// Errors returned by [`CappedToken`](crate::token::CappedToken) operations.
///
/// A failed operation never leaves partial state behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Caller is not the configured authority.
    #[error("unauthorized caller: {caller}")]
    Unauthorized { caller: Address },

    /// Mint would push total issued past the cap.
    #[error("supply cap exceeded: requested {requested}, issued {issued}, cap {cap}")]
    SupplyExceeded { requested: u64, issued: u64, cap: u64 },

    /// Balance-moving operation attempted while paused.
    #[error("transfers are paused")]
    TransfersPaused,

    #[error("transfers are already paused")]
    AlreadyPaused,

    #[error("transfers are not paused")]
    NotPaused,

    /// Beneficiary already has a vesting wallet.
    #[error("vesting schedule already exists for {0}")]
    ScheduleAlreadyExists(Address),

    /// Vesting allocation must be positive.
    #[error("invalid amount: must be greater than zero")]
    InvalidAmount,

    /// Vesting duration must be positive.
    #[error("invalid duration: must be greater than zero")]
    InvalidDuration,

    /// Beneficiary has no vesting wallet.
    #[error("no vesting schedule for {0}")]
    NoScheduleFound(Address),

    /// Wallet handle does not refer to a registered wallet.
    #[error("unknown vesting wallet: {0}")]
    UnknownWallet(WalletId),

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },

    #[error("insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: u64, need: u64 },

    /// Funds held by a vesting wallet leave it only through a release.
    #[error("vesting wallet {0} can only be debited by a release")]
    WalletCustody(Address),

    /// The zero address was used where a real holder is required.
    #[error("invalid address: zero address not allowed")]
    InvalidAddress,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl From<LedgerError> for TokenError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance { have, need } => Self::InsufficientBalance { have, need },
            LedgerError::InsufficientAllowance { have, need } => {
                Self::InsufficientAllowance { have, need }
            }
            LedgerError::Overflow => Self::ArithmeticOverflow,
        }
    }
}

impl From<WalletError> for TokenError {
    fn from(_: WalletError) -> Self {
        Self::ArithmeticOverflow
    }
}
