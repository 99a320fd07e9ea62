//! Per-operation undo journal.
//!
//! Each mutation made inside an operation records how to invert itself.
//! On failure the entries are replayed newest-first; on success they are
//! dropped and the staged events are committed.

use vesta_core::address::Address;

use crate::event::TokenEvent;
use crate::registry::WalletId;

/// Inverse of one applied mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Undo {
    /// `amount` was credited to `holder`; undo by debiting it.
    Credited { holder: Address, amount: u64 },
    /// `amount` was debited from `holder`; undo by crediting it.
    Debited { holder: Address, amount: u64 },
    /// `amount` moved `from` → `to`; undo by moving it back.
    Transferred { from: Address, to: Address, amount: u64 },
    AllowanceChanged { owner: Address, spender: Address, previous: u64 },
    PauseChanged { previous: bool },
    AuthorityChanged { previous: Address },
    /// A wallet was appended to the registry for `beneficiary`.
    WalletRegistered { beneficiary: Address },
    /// A wallet's released counter advanced by `amount`.
    ReleaseRecorded { wallet: WalletId, amount: u64 },
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    undo: Vec<Undo>,
    events: Vec<TokenEvent>,
}

impl Journal {
    pub(crate) fn record(&mut self, undo: Undo) {
        self.undo.push(undo);
    }

    pub(crate) fn emit(&mut self, event: TokenEvent) {
        self.events.push(event);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    /// Undo entries, newest first.
    pub(crate) fn into_rollback(self) -> impl Iterator<Item = Undo> {
        self.undo.into_iter().rev()
    }

    pub(crate) fn into_events(self) -> Vec<TokenEvent> {
        self.events
    }
}
