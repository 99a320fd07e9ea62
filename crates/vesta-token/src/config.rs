//! Token construction parameters.
//!
//! [`TokenConfig`] is plain serde data: the CLI layers it from a config file,
//! `VESTA_*` environment variables and flags, and tests build it directly.

use serde::{Deserialize, Serialize};
use vesta_core::address::Address;
use vesta_core::constants::DEFAULT_DECIMALS;

use crate::error::TokenError;

/// Descriptive metadata. Has no effect on ledger behaviour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Everything needed to construct a [`CappedToken`](crate::token::CappedToken).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    #[serde(default = "default_decimals")]
    pub decimals: u8,
    /// Issuance ceiling in base units. Fixed for the token's lifetime.
    pub max_supply: u64,
    /// Identity allowed to mint, pause and create vesting schedules.
    pub authority: Address,
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

impl TokenConfig {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        max_supply: u64,
        authority: Address,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DEFAULT_DECIMALS,
            max_supply,
            authority,
        }
    }

    /// Check the configuration can back a token.
    ///
    /// # Errors
    ///
    /// [`TokenError::InvalidConfig`] for a zero cap, a zero authority or an
    /// empty symbol.
    pub fn validate(&self) -> Result<(), TokenError> {
        if self.max_supply == 0 {
            return Err(TokenError::InvalidConfig("max_supply must be greater than zero".into()));
        }
        if self.authority.is_zero() {
            return Err(TokenError::InvalidConfig("authority must not be the zero address".into()));
        }
        if self.symbol.trim().is_empty() {
            return Err(TokenError::InvalidConfig("symbol must not be empty".into()));
        }
        Ok(())
    }

    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }
}
