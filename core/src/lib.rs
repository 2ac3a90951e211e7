// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Cofre — Core Primitives
//!
//! Shared foundation for the Cofre savings-vault system. Everything the
//! contract layer needs that is not contract logic itself lives here:
//!
//! - **hash** — BLAKE3 hashing: plain, multi-part, and domain-separated.
//!   Contract addresses and asset identifiers are derived here, so this
//!   module is consensus-critical by proxy.
//! - **address** — 32-byte handles for identities and contract instances,
//!   rendered as Bech32 strings with the `cofre` prefix.
//! - **asset** — fungible asset kinds: content-addressed identifiers,
//!   metadata, and the three reference stablecoins vaults accept.
//! - **ledger** — the external asset ledger. Vaults never hold raw funds;
//!   they instruct the ledger to move balances between accounts.
//! - **clock** — the injected time source. Contract operations receive the
//!   current instant as an argument; the clock is how callers obtain it.
//! - **config** — every constant in the system. Hardcode a number outside
//!   this module and you owe the team coffee.
//!
//! ## Design Philosophy
//!
//! 1. All monetary amounts are `u64` in smallest-unit denomination. No
//!    floating point, no decimals in arithmetic — `decimals` is display
//!    metadata only.
//! 2. Checked arithmetic everywhere money moves. Wrapping arithmetic and
//!    money do not mix.
//! 3. Every public type is serializable (serde) so system state can be
//!    snapshotted, transported, or inspected as JSON.

pub mod address;
pub mod asset;
pub mod clock;
pub mod config;
pub mod hash;
pub mod ledger;

pub use address::{Address, AddressError};
pub use asset::{AssetId, AssetInfo};
pub use clock::Clock;
pub use ledger::{AssetLedger, LedgerError};
