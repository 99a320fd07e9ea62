//! # vesta-core
//! Foundation types and primitives for the Vesta ledger.
//!
//! - [`address::Address`] — 32-byte holder identity
//! - [`ledger::MemoryLedger`] — in-memory fungible ledger implementing [`traits::Ledger`]
//! - [`escrow::VestingWallet`] — linear-release escrow primitive
//! - [`clock`] — wall-clock and manual [`traits::Clock`] implementations

pub mod address;
pub mod clock;
pub mod constants;
pub mod error;
pub mod escrow;
pub mod ledger;
pub mod traits;

pub use address::Address;
pub use escrow::VestingWallet;
pub use ledger::MemoryLedger;
