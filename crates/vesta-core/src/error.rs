//! Error types for the Vesta primitives.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: u64, need: u64 },
    #[error("insufficient allowance: have {have}, need {need}")] InsufficientAllowance { have: u64, need: u64 },
    #[error("arithmetic overflow")] Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid length: expected 32 bytes, got {0}")] InvalidLength(usize),
    #[error("invalid hex encoding")] InvalidHex,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("cannot revert {amount}: only {released} released")] RevertExceedsReleased { amount: u64, released: u64 },
    #[error("arithmetic overflow")] Overflow,
}
