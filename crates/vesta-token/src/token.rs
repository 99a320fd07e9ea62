//! The capped token: issuance, transfers, pause and vesting in one place.
//!
//! Every public mutating method runs inside [`CappedToken::atomically`]:
//! mutations record their inverse in a [`Journal`], and any error replays the
//! journal newest-first so the failed operation leaves no trace, not even
//! events.
//!
//! All balance movements funnel through one chokepoint, `update`, which
//! consults the [`TransferGate`] before touching the ledger. Mints (including
//! the funding mint of a vesting wallet), burns, transfers and vesting
//! releases are therefore all blocked while the token is paused.

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use vesta_core::address::Address;
use vesta_core::escrow::VestingWallet;
use vesta_core::ledger::MemoryLedger;
use vesta_core::traits::{Clock, Ledger};

use crate::config::{TokenConfig, TokenMetadata};
use crate::error::TokenError;
use crate::event::TokenEvent;
use crate::gate::TransferGate;
use crate::journal::{Journal, Undo};
use crate::registry::{VestingRegistry, VestingSchedule, WalletId, WalletRef};
use crate::supply::SupplyCap;

/// Fungible token with a fixed supply cap, a global pause gate and a
/// one-wallet-per-beneficiary vesting registry.
///
/// Methods take `&mut self`, so operations on one instance are serialized
/// by the borrow checker. Use [`SharedToken`](crate::shared::SharedToken)
/// to share an instance across threads.
pub struct CappedToken<L: Ledger = MemoryLedger> {
    metadata: TokenMetadata,
    supply: SupplyCap,
    gate: TransferGate,
    authority: Address,
    ledger: L,
    registry: VestingRegistry,
    clock: Arc<dyn Clock>,
    /// Events of committed operations, oldest first.
    events: Vec<TokenEvent>,
}

impl<L: Ledger + std::fmt::Debug> std::fmt::Debug for CappedToken<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CappedToken")
            .field("metadata", &self.metadata)
            .field("supply", &self.supply)
            .field("gate", &self.gate)
            .field("authority", &self.authority)
            .field("ledger", &self.ledger)
            .field("registry", &self.registry)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl CappedToken<MemoryLedger> {
    /// Create a token backed by an empty in-memory ledger.
    pub fn new(config: TokenConfig, clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        Self::with_ledger(config, MemoryLedger::new(), clock)
    }
}

impl<L: Ledger> CappedToken<L> {
    /// Create a token on top of an existing ledger.
    ///
    /// # Errors
    ///
    /// [`TokenError::InvalidConfig`] if the config is invalid or the ledger
    /// already holds more than `max_supply`.
    pub fn with_ledger(config: TokenConfig, ledger: L, clock: Arc<dyn Clock>) -> Result<Self, TokenError> {
        config.validate()?;
        let supply = SupplyCap::new(config.max_supply)?;
        let issued = ledger.total_issued();
        if issued > supply.max_supply() {
            return Err(TokenError::InvalidConfig(format!(
                "ledger already holds {issued}, above max_supply {}",
                supply.max_supply()
            )));
        }
        info!(
            name = %config.name,
            symbol = %config.symbol,
            max_supply = config.max_supply,
            authority = %config.authority,
            "token initialized"
        );
        Ok(Self::from_parts(
            config.metadata(),
            supply,
            TransferGate::new(),
            config.authority,
            ledger,
            VestingRegistry::new(),
            clock,
        ))
    }

    pub(crate) fn from_parts(
        metadata: TokenMetadata,
        supply: SupplyCap,
        gate: TransferGate,
        authority: Address,
        ledger: L,
        registry: VestingRegistry,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            metadata,
            supply,
            gate,
            authority,
            ledger,
            registry,
            clock,
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn max_supply(&self) -> u64 {
        self.supply.max_supply()
    }

    pub fn total_issued(&self) -> u64 {
        self.ledger.total_issued()
    }

    /// Amount that can still be minted before the cap is reached.
    pub fn headroom(&self) -> u64 {
        self.supply.headroom(self.ledger.total_issued())
    }

    pub fn balance_of(&self, holder: &Address) -> u64 {
        self.ledger.balance_of(holder)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u64 {
        self.ledger.allowance(owner, spender)
    }

    pub fn is_paused(&self) -> bool {
        self.gate.is_paused()
    }

    pub fn authority(&self) -> Address {
        self.authority
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn registry(&self) -> &VestingRegistry {
        &self.registry
    }

    /// Current time according to the token's clock.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Events of committed operations, oldest first.
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Take all recorded events, leaving the log empty.
    pub fn drain_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    /// Handle of `beneficiary`'s vesting wallet, if one was created.
    pub fn vesting_wallet(&self, beneficiary: &Address) -> Option<WalletRef> {
        self.registry.lookup(beneficiary)
    }

    /// Wallet by arena id.
    pub fn wallet(&self, id: WalletId) -> Option<&VestingWallet> {
        self.registry.wallet(id)
    }

    /// Current state of `beneficiary`'s schedule.
    pub fn vesting_schedule(&self, beneficiary: &Address) -> Option<VestingSchedule> {
        let wallet_ref = self.registry.lookup(beneficiary)?;
        let wallet = self.registry.wallet(wallet_ref.id)?;
        let balance = self.ledger.balance_of(&wallet.address());
        Some(VestingSchedule {
            beneficiary: wallet.beneficiary(),
            wallet: wallet_ref,
            total_allocated: balance.saturating_add(wallet.released()),
            start: wallet.start(),
            duration: wallet.duration(),
            released: wallet.released(),
        })
    }

    /// Amount `beneficiary` could release right now.
    pub fn releasable_amount(&self, beneficiary: &Address) -> Result<u64, TokenError> {
        let wallet = self.wallet_of(beneficiary)?;
        let balance = self.ledger.balance_of(&wallet.address());
        Ok(wallet.releasable(balance, self.clock.now())?)
    }

    /// Amount of `beneficiary`'s allocation vested at `timestamp`, released or not.
    pub fn vested_amount(&self, beneficiary: &Address, timestamp: u64) -> Result<u64, TokenError> {
        let wallet = self.wallet_of(beneficiary)?;
        let balance = self.ledger.balance_of(&wallet.address());
        let total = wallet.total_allocation(balance)?;
        Ok(wallet.vested_amount(total, timestamp))
    }

    fn wallet_of(&self, beneficiary: &Address) -> Result<&VestingWallet, TokenError> {
        self.registry
            .lookup(beneficiary)
            .and_then(|r| self.registry.wallet(r.id))
            .ok_or(TokenError::NoScheduleFound(*beneficiary))
    }

    // ------------------------------------------------------------------
    // Authority-restricted operations
    // ------------------------------------------------------------------

    /// Mint `amount` new units to `to`. Authority only.
    ///
    /// A zero amount is a legal no-op mint.
    ///
    /// # Errors
    ///
    /// - [`TokenError::Unauthorized`] if `caller` is not the authority
    /// - [`TokenError::InvalidAddress`] if `to` is the zero address
    /// - [`TokenError::SupplyExceeded`] if the cap would be passed
    /// - [`TokenError::TransfersPaused`] while paused
    pub fn mint(&mut self, caller: &Address, to: &Address, amount: u64) -> Result<(), TokenError> {
        self.atomically("mint", |token, journal| {
            token.ensure_authority(caller)?;
            token.mint_capped(journal, to, amount)
        })?;
        info!(%to, amount, total_issued = self.total_issued(), "minted");
        Ok(())
    }

    /// Halt every balance movement. Authority only.
    pub fn pause(&mut self, caller: &Address) -> Result<(), TokenError> {
        self.atomically("pause", |token, journal| {
            token.ensure_authority(caller)?;
            token.gate.pause()?;
            journal.record(Undo::PauseChanged { previous: false });
            journal.emit(TokenEvent::Paused { by: *caller });
            Ok(())
        })?;
        info!(by = %caller, "transfers paused");
        Ok(())
    }

    /// Resume balance movements. Authority only.
    pub fn unpause(&mut self, caller: &Address) -> Result<(), TokenError> {
        self.atomically("unpause", |token, journal| {
            token.ensure_authority(caller)?;
            token.gate.unpause()?;
            journal.record(Undo::PauseChanged { previous: true });
            journal.emit(TokenEvent::Unpaused { by: *caller });
            Ok(())
        })?;
        info!(by = %caller, "transfers resumed");
        Ok(())
    }

    /// Hand the authority role to `new_authority`. Authority only.
    pub fn transfer_authority(&mut self, caller: &Address, new_authority: &Address) -> Result<(), TokenError> {
        self.atomically("transfer_authority", |token, journal| {
            token.ensure_authority(caller)?;
            if new_authority.is_zero() {
                return Err(TokenError::InvalidAddress);
            }
            let previous = token.authority;
            token.authority = *new_authority;
            journal.record(Undo::AuthorityChanged { previous });
            journal.emit(TokenEvent::AuthorityTransferred { previous, new: *new_authority });
            Ok(())
        })?;
        info!(new = %new_authority, "authority transferred");
        Ok(())
    }

    /// Create `beneficiary`'s vesting wallet and fund it with `amount` newly
    /// minted units. Authority only.
    ///
    /// `start` may lie in the past, in which case part of the allocation is
    /// releasable immediately.
    ///
    /// The allocation is the wallet's balance plus what it has released, so
    /// units already sitting at `Address::vesting_wallet(beneficiary)` when
    /// the schedule is created join the allocation and vest on the same
    /// curve. Before registration that address is an ordinary holder.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`TokenError::Unauthorized`]
    /// - [`TokenError::ScheduleAlreadyExists`] if the beneficiary has a wallet
    /// - [`TokenError::InvalidAmount`] if `amount == 0`
    /// - [`TokenError::InvalidDuration`] if `duration == 0`
    /// - [`TokenError::InvalidAddress`] if `beneficiary` is the zero address
    /// - [`TokenError::SupplyExceeded`] / [`TokenError::TransfersPaused`] from the funding mint
    pub fn create_vesting_schedule(
        &mut self,
        caller: &Address,
        beneficiary: &Address,
        amount: u64,
        start: u64,
        duration: u64,
    ) -> Result<WalletRef, TokenError> {
        let wallet = self.atomically("create_vesting_schedule", |token, journal| {
            token.ensure_authority(caller)?;
            if token.registry.contains(beneficiary) {
                return Err(TokenError::ScheduleAlreadyExists(*beneficiary));
            }
            if amount == 0 {
                return Err(TokenError::InvalidAmount);
            }
            if duration == 0 {
                return Err(TokenError::InvalidDuration);
            }
            if beneficiary.is_zero() {
                return Err(TokenError::InvalidAddress);
            }

            let wallet = token
                .registry
                .register(VestingWallet::new(*beneficiary, start, duration))?;
            journal.record(Undo::WalletRegistered { beneficiary: *beneficiary });

            token.mint_capped(journal, &wallet.address, amount)?;
            journal.emit(TokenEvent::VestingScheduleCreated {
                beneficiary: *beneficiary,
                wallet: wallet.address,
                amount,
                start,
                duration,
            });
            Ok(wallet)
        })?;
        info!(
            %beneficiary,
            wallet = %wallet.address,
            id = %wallet.id,
            amount,
            start,
            duration,
            "vesting schedule created"
        );
        Ok(wallet)
    }

    // ------------------------------------------------------------------
    // Public vesting operations
    // ------------------------------------------------------------------

    /// Release everything vested so far to `beneficiary`. Callable by anyone.
    ///
    /// Returns the amount transferred, which is zero when nothing new has
    /// vested since the last release.
    ///
    /// # Errors
    ///
    /// - [`TokenError::NoScheduleFound`] if the beneficiary has no wallet
    /// - [`TokenError::TransfersPaused`] while paused
    pub fn release_vested_tokens(&mut self, beneficiary: &Address) -> Result<u64, TokenError> {
        let wallet = self
            .registry
            .lookup(beneficiary)
            .ok_or(TokenError::NoScheduleFound(*beneficiary))?;
        self.release_wallet(wallet.id)
    }

    /// Release everything vested so far from wallet `id` to its beneficiary.
    /// Callable by anyone.
    ///
    /// The wallet's released counter is advanced before funds move.
    pub fn release_wallet(&mut self, id: WalletId) -> Result<u64, TokenError> {
        let now = self.clock.now();
        let (beneficiary, amount) = self.atomically("release", |token, journal| {
            let wallet = token.registry.wallet(id).ok_or(TokenError::UnknownWallet(id))?;
            let (address, beneficiary) = (wallet.address(), wallet.beneficiary());
            token.gate.ensure_active()?;

            let balance = token.ledger.balance_of(&address);
            let amount = token
                .registry
                .wallet_mut(id)
                .ok_or(TokenError::UnknownWallet(id))?
                .record_release(balance, now)?;
            if amount == 0 {
                return Ok((beneficiary, 0));
            }
            journal.record(Undo::ReleaseRecorded { wallet: id, amount });

            token.update(journal, Some(&address), Some(&beneficiary), amount)?;
            journal.emit(TokenEvent::TokensReleased { beneficiary, wallet: address, amount });
            Ok((beneficiary, amount))
        })?;
        if amount > 0 {
            info!(%beneficiary, wallet = %id, amount, now, "vested tokens released");
        } else {
            debug!(%beneficiary, wallet = %id, now, "nothing releasable");
        }
        Ok(amount)
    }

    // ------------------------------------------------------------------
    // Holder operations
    // ------------------------------------------------------------------

    /// Move `amount` from `caller` to `to`.
    ///
    /// # Errors
    ///
    /// [`TokenError::WalletCustody`] if `caller` is a vesting wallet.
    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: u64) -> Result<(), TokenError> {
        self.atomically("transfer", |token, journal| {
            token.ensure_not_wallet(caller)?;
            if to.is_zero() {
                return Err(TokenError::InvalidAddress);
            }
            token.update(journal, Some(caller), Some(to), amount)
        })?;
        debug!(from = %caller, %to, amount, "transfer");
        Ok(())
    }

    /// Let `spender` move up to `amount` of `caller`'s balance.
    ///
    /// Not a balance movement, so allowed while paused. Vesting wallets
    /// cannot grant allowances.
    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: u64) -> Result<(), TokenError> {
        self.atomically("approve", |token, journal| {
            token.ensure_not_wallet(caller)?;
            if spender.is_zero() {
                return Err(TokenError::InvalidAddress);
            }
            let previous = token.ledger.allowance(caller, spender);
            token.ledger.approve(caller, spender, amount);
            journal.record(Undo::AllowanceChanged { owner: *caller, spender: *spender, previous });
            journal.emit(TokenEvent::Approval { owner: *caller, spender: *spender, amount });
            Ok(())
        })
    }

    /// Move `amount` from `from` to `to`, spending `caller`'s allowance.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u64,
    ) -> Result<(), TokenError> {
        self.atomically("transfer_from", |token, journal| {
            token.ensure_not_wallet(from)?;
            if to.is_zero() {
                return Err(TokenError::InvalidAddress);
            }
            let previous = token.ledger.allowance(from, caller);
            token.ledger.spend_allowance(from, caller, amount)?;
            journal.record(Undo::AllowanceChanged { owner: *from, spender: *caller, previous });
            token.update(journal, Some(from), Some(to), amount)
        })?;
        debug!(spender = %caller, %from, %to, amount, "transfer_from");
        Ok(())
    }

    /// Destroy `amount` of `caller`'s balance, freeing room under the cap.
    pub fn burn(&mut self, caller: &Address, amount: u64) -> Result<(), TokenError> {
        self.atomically("burn", |token, journal| {
            token.ensure_not_wallet(caller)?;
            token.update(journal, Some(caller), None, amount)
        })?;
        info!(holder = %caller, amount, total_issued = self.total_issued(), "burned");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn ensure_authority(&self, caller: &Address) -> Result<(), TokenError> {
        if *caller != self.authority {
            return Err(TokenError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Holder-initiated debits may not draw on a vesting wallet.
    fn ensure_not_wallet(&self, holder: &Address) -> Result<(), TokenError> {
        if self.registry.is_wallet_address(holder) {
            return Err(TokenError::WalletCustody(*holder));
        }
        Ok(())
    }

    /// Capped mint path shared by `mint` and vesting-wallet funding.
    fn mint_capped(&mut self, journal: &mut Journal, to: &Address, amount: u64) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::InvalidAddress);
        }
        self.supply.check(self.ledger.total_issued(), amount)?;
        self.update(journal, None, Some(to), amount)
    }

    /// The single chokepoint for balance movements.
    ///
    /// `from: None` mints, `to: None` burns.
    fn update(
        &mut self,
        journal: &mut Journal,
        from: Option<&Address>,
        to: Option<&Address>,
        amount: u64,
    ) -> Result<(), TokenError> {
        self.gate.ensure_active()?;
        match (from, to) {
            (None, Some(to)) => {
                self.ledger.credit(to, amount)?;
                journal.record(Undo::Credited { holder: *to, amount });
            }
            (Some(from), None) => {
                self.ledger.debit(from, amount)?;
                journal.record(Undo::Debited { holder: *from, amount });
            }
            (Some(from), Some(to)) => {
                self.ledger.transfer(from, to, amount)?;
                journal.record(Undo::Transferred { from: *from, to: *to, amount });
            }
            (None, None) => return Err(TokenError::InvalidAddress),
        }
        journal.emit(TokenEvent::Transfer { from: from.copied(), to: to.copied(), amount });
        Ok(())
    }

    /// Run `f` as one all-or-nothing operation.
    fn atomically<T, F>(&mut self, op: &'static str, f: F) -> Result<T, TokenError>
    where
        F: FnOnce(&mut Self, &mut Journal) -> Result<T, TokenError>,
    {
        let mut journal = Journal::default();
        match f(self, &mut journal) {
            Ok(value) => {
                self.events.extend(journal.into_events());
                Ok(value)
            }
            Err(err) => {
                if journal.is_empty() {
                    debug!(op, %err, "operation rejected");
                } else {
                    warn!(op, %err, "operation failed, rolling back");
                    self.revert(journal);
                }
                Err(err)
            }
        }
    }

    fn revert(&mut self, journal: Journal) {
        for undo in journal.into_rollback() {
            let result: Result<(), TokenError> = match undo {
                Undo::Credited { holder, amount } => self.ledger.debit(&holder, amount).map_err(Into::into),
                Undo::Debited { holder, amount } => self.ledger.credit(&holder, amount).map_err(Into::into),
                Undo::Transferred { from, to, amount } => {
                    self.ledger.transfer(&to, &from, amount).map_err(Into::into)
                }
                Undo::AllowanceChanged { owner, spender, previous } => {
                    self.ledger.approve(&owner, &spender, previous);
                    Ok(())
                }
                Undo::PauseChanged { previous } => {
                    self.gate.set_paused(previous);
                    Ok(())
                }
                Undo::AuthorityChanged { previous } => {
                    self.authority = previous;
                    Ok(())
                }
                Undo::WalletRegistered { beneficiary } => {
                    self.registry.unregister_last(&beneficiary);
                    Ok(())
                }
                Undo::ReleaseRecorded { wallet, amount } => match self.registry.wallet_mut(wallet) {
                    Some(w) => w.revert_release(amount).map_err(Into::into),
                    None => Err(TokenError::UnknownWallet(wallet)),
                },
            };
            if let Err(err) = result {
                error!(?undo, %err, "rollback step failed");
            }
        }
    }
}
