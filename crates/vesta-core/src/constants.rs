//! Ledger constants. All amounts are in base units (1 token = 10^8 units).

/// Base units per whole token.
pub const COIN: u64 = 100_000_000;

/// Decimal places implied by [`COIN`].
pub const DEFAULT_DECIMALS: u8 = 8;

/// Issuance ceiling `vesta init` uses when none is configured.
pub const DEFAULT_MAX_SUPPLY: u64 = 1_000_000_000 * COIN;

/// Domain tag mixed into every derived vesting-wallet address.
///
/// Keeps wallet addresses out of the space of externally chosen identities.
pub const WALLET_ADDRESS_DOMAIN: &[u8] = b"vesta/vesting-wallet/v1";

/// Length in bytes of an [`Address`](crate::address::Address).
pub const ADDRESS_LEN: usize = 32;
