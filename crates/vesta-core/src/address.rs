//! Holder identities.
//!
//! An [`Address`] is an opaque 32-byte identity. Externally it renders as 64
//! lowercase hex characters; parsing also accepts an optional `0x` prefix.
//! Vesting wallets get addresses derived with BLAKE3 from
//! [`WALLET_ADDRESS_DOMAIN`] and the beneficiary, so each beneficiary maps to
//! exactly one wallet address.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::{ADDRESS_LEN, WALLET_ADDRESS_DOMAIN};
use crate::error::AddressError;

/// A 32-byte holder identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; ADDRESS_LEN]);

impl Address {
    /// The zero address. Never a valid mint recipient, beneficiary or authority.
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    /// Create an address from a byte array.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Check if this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Address of the vesting wallet held on behalf of `beneficiary`.
    pub fn vesting_wallet(beneficiary: &Address) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(WALLET_ADDRESS_DOMAIN);
        hasher.update(beneficiary.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Parse a hex-encoded address, with or without a `0x` prefix.
    pub fn decode(s: &str) -> Result<Self, AddressError> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| AddressError::InvalidHex)?;
        let array: [u8; ADDRESS_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Lowercase hex encoding without prefix.
    pub fn encode(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}
