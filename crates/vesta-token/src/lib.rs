//! # vesta-token — capped issuance, transfer gate, vesting registry.
//!
//! Orchestrates the [`vesta_core`] primitives into a single token:
//! - [`supply::SupplyCap`] — immutable issuance ceiling checked on every mint
//! - [`gate::TransferGate`] — global pause flag checked on every balance movement
//! - [`registry::VestingRegistry`] — one vesting wallet per beneficiary
//! - [`token::CappedToken`] — the operations, each atomic via an undo journal
//! - [`snapshot`] — JSON persistence of the whole token state
//! - [`shared::SharedToken`] — lock-serialized handle for multi-threaded use

pub mod config;
pub mod error;
pub mod event;
pub mod gate;
mod journal;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod supply;
pub mod token;

pub use config::{TokenConfig, TokenMetadata};
pub use error::TokenError;
pub use event::TokenEvent;
pub use registry::{VestingSchedule, WalletId, WalletRef};
pub use shared::SharedToken;
pub use snapshot::{SnapshotError, TokenSnapshot};
pub use token::CappedToken;
