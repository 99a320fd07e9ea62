//! Global transfer gate.

use serde::{Deserialize, Serialize};

use crate::error::TokenError;

/// Gate position. Tokens start [`Active`](GateState::Active).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Active,
    Paused,
}

/// Pause flag consulted before every balance movement.
///
/// Only explicit [`pause`](Self::pause) / [`unpause`](Self::unpause) calls
/// change the state; nothing resumes automatically.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferGate {
    state: GateState,
}

impl TransferGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_paused(paused: bool) -> Self {
        let mut gate = Self::new();
        gate.set_paused(paused);
        gate
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == GateState::Paused
    }

    /// Fail with [`TokenError::TransfersPaused`] while paused.
    pub fn ensure_active(&self) -> Result<(), TokenError> {
        match self.state {
            GateState::Active => Ok(()),
            GateState::Paused => Err(TokenError::TransfersPaused),
        }
    }

    pub fn pause(&mut self) -> Result<(), TokenError> {
        if self.is_paused() {
            return Err(TokenError::AlreadyPaused);
        }
        self.state = GateState::Paused;
        Ok(())
    }

    pub fn unpause(&mut self) -> Result<(), TokenError> {
        if !self.is_paused() {
            return Err(TokenError::NotPaused);
        }
        self.state = GateState::Active;
        Ok(())
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.state = if paused { GateState::Paused } else { GateState::Active };
    }
}
