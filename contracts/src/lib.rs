//! # Cofre Contracts
//!
//! The contract layer of the Cofre savings system: state machines that
//! move money on the external asset ledger under strict, auditable rules.
//!
//! - **Savings Vault** — a single-owner, time-locked container for a fixed
//!   allow-list of stablecoins. Withdraw after maturity and keep every
//!   unit; withdraw early and 15% of the amount goes to the penalty
//!   recipient. The first withdrawal closes the vault for good.
//! - **Vault Factory** — deploys vault instances sharing one logic
//!   template, optionally at caller-predictable addresses, and keeps the
//!   global and per-creator registries.
//!
//! ## Design Principles
//!
//! 1. All monetary operations check for overflow — `checked_add` and
//!    `checked_sub` everywhere, because wrapping arithmetic and money do
//!    not mix.
//! 2. State transitions are explicit: enum variants, not boolean flags.
//! 3. Every operation validates all preconditions before the first
//!    mutation, so a failed call leaves no trace.
//! 4. Every public type is serializable (serde) for wire transport and
//!    persistent storage.

pub mod events;
pub mod factory;
pub mod vault;

pub use events::VaultCreated;
pub use factory::{FactoryError, VaultFactory};
pub use vault::{SavingsVault, VaultError, VaultStatus, WithdrawalReceipt};
