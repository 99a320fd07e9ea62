//! Integration and property-based test suite for Vesta.
//!
//! The tests drive a [`vesta_token::CappedToken`] through its public API
//! only, checking supply, vesting and pause invariants under randomized
//! operation sequences.

pub mod helpers;
