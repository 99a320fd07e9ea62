//! JSON persistence of a whole token.
//!
//! A [`TokenSnapshot`] captures config, gate state, the ledger and every
//! vesting wallet. Loading re-validates everything a hand-edited file could
//! break: the ledger total, the cap, duplicate beneficiaries and derived
//! wallet addresses.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use vesta_core::address::Address;
use vesta_core::escrow::VestingWallet;
use vesta_core::ledger::MemoryLedger;
use vesta_core::traits::{Clock, Ledger};

use crate::config::{TokenConfig, TokenMetadata};
use crate::error::TokenError;
use crate::gate::TransferGate;
use crate::registry::VestingRegistry;
use crate::supply::SupplyCap;
use crate::token::CappedToken;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors from saving or loading a snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization: {0}")]
    Serialization(String),

    /// The file parsed but its contents are inconsistent.
    #[error("corrupted snapshot: {0}")]
    Corrupted(String),

    #[error("unsupported snapshot version {found} (expected {})", SNAPSHOT_VERSION)]
    UnsupportedVersion { found: u32 },

    /// The stored state fails token validation.
    #[error("invalid snapshot state: {0}")]
    Invalid(#[from] TokenError),
}

/// Serializable image of a [`CappedToken`] backed by a [`MemoryLedger`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub version: u32,
    pub metadata: TokenMetadata,
    pub max_supply: u64,
    pub authority: Address,
    pub paused: bool,
    pub ledger: MemoryLedger,
    /// Wallets in registry order.
    pub wallets: Vec<VestingWallet>,
}

impl TokenSnapshot {
    /// Write the snapshot as pretty JSON.
    ///
    /// The file is written next to `path` and renamed over it, so a crash
    /// never leaves a half-written snapshot behind.
    pub fn save_to_file(&self, path: &Path) -> Result<(), SnapshotError> {
        let json = serde_json::to_vec_pretty(self).map_err(|e| SnapshotError::Serialization(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| SnapshotError::Io(e.to_string()))?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| SnapshotError::Io(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| SnapshotError::Io(e.to_string()))
    }

    /// Read a snapshot written by [`save_to_file`](Self::save_to_file).
    ///
    /// Only the format is checked here; [`CappedToken::from_snapshot`]
    /// validates the state.
    pub fn load_from_file(path: &Path) -> Result<Self, SnapshotError> {
        let data = std::fs::read(path).map_err(|e| SnapshotError::Io(e.to_string()))?;
        let snapshot: Self = serde_json::from_slice(&data)
            .map_err(|e| SnapshotError::Corrupted(format!("invalid JSON: {e}")))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion { found: snapshot.version });
        }
        Ok(snapshot)
    }
}

impl CappedToken<MemoryLedger> {
    /// Capture the full token state.
    ///
    /// The event log is not part of the snapshot.
    pub fn snapshot(&self) -> TokenSnapshot {
        TokenSnapshot {
            version: SNAPSHOT_VERSION,
            metadata: self.metadata().clone(),
            max_supply: self.max_supply(),
            authority: self.authority(),
            paused: self.is_paused(),
            ledger: self.ledger().clone(),
            wallets: self.registry().wallets().to_vec(),
        }
    }

    /// Rebuild a token from a snapshot.
    ///
    /// # Errors
    ///
    /// - [`SnapshotError::UnsupportedVersion`] for an unknown format version
    /// - [`SnapshotError::Corrupted`] if the ledger total disagrees with its
    ///   balances or exceeds the cap, a wallet address does not match its
    ///   beneficiary, or a released counter cannot be added to the balance
    /// - [`SnapshotError::Invalid`] if the config or registry is invalid
    pub fn from_snapshot(snapshot: TokenSnapshot, clock: Arc<dyn Clock>) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion { found: snapshot.version });
        }

        let config = TokenConfig {
            name: snapshot.metadata.name.clone(),
            symbol: snapshot.metadata.symbol.clone(),
            decimals: snapshot.metadata.decimals,
            max_supply: snapshot.max_supply,
            authority: snapshot.authority,
        };
        config.validate()?;
        let supply = SupplyCap::new(snapshot.max_supply)?;

        if !snapshot.ledger.is_consistent() {
            return Err(SnapshotError::Corrupted("ledger total does not match balances".into()));
        }
        let issued = snapshot.ledger.total_issued();
        if issued > supply.max_supply() {
            return Err(SnapshotError::Corrupted(format!(
                "total issued {issued} exceeds max supply {}",
                supply.max_supply()
            )));
        }
        for wallet in &snapshot.wallets {
            if wallet.address() != Address::vesting_wallet(&wallet.beneficiary()) {
                return Err(SnapshotError::Corrupted(format!(
                    "wallet address {} does not belong to beneficiary {}",
                    wallet.address(),
                    wallet.beneficiary()
                )));
            }
            let balance = snapshot.ledger.balance_of(&wallet.address());
            if wallet.total_allocation(balance).is_err() {
                return Err(SnapshotError::Corrupted(format!(
                    "wallet {} released counter overflows its allocation",
                    wallet.address()
                )));
            }
        }
        let registry = VestingRegistry::from_wallets(snapshot.wallets)?;

        info!(
            symbol = %snapshot.metadata.symbol,
            issued,
            wallets = registry.len(),
            paused = snapshot.paused,
            "token restored from snapshot"
        );
        Ok(Self::from_parts(
            snapshot.metadata,
            supply,
            TransferGate::with_paused(snapshot.paused),
            snapshot.authority,
            snapshot.ledger,
            registry,
            clock,
        ))
    }
}
