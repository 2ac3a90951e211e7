//! # Contract Events
//!
//! Structured records emitted by the factory for off-process listeners.
//! The factory keeps every event in an append-only log and also mirrors
//! each one as a `tracing` event, so both in-process observers and log
//! aggregators see the same stream.

use serde::{Deserialize, Serialize};

use cofre_core::address::Address;

/// Emitted once per successful vault creation.
///
/// For callers that did not use the deterministic creation path, this
/// record is how they learn the address of the vault they just created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultCreated {
    /// The address of the new vault.
    pub vault: Address,

    /// The identity that requested the creation (and owns the vault).
    pub creator: Address,

    /// The saving purpose the vault was initialized with.
    pub purpose: String,
}
