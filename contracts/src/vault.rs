//! # Savings Vault Contract
//!
//! A time-locked savings container for a single owner. The lifecycle is:
//!
//! 1. **Instantiate** — the factory allocates a zeroed vault bound to an
//!    address on the asset ledger.
//! 2. **Initialize** — owner, purpose, duration, allow-list, and penalty
//!    recipient are fixed forever; the vault becomes active.
//! 3. **Deposit** — anyone with a ledger approval can push allow-listed
//!    assets into the vault while it is active.
//! 4. **Withdraw** — the owner takes funds out. At or after maturity the
//!    full amount is paid; before maturity, 15% is diverted to the
//!    penalty recipient. Either way, the first withdrawal closes the
//!    vault permanently.
//!
//! ## The single-shot close
//!
//! Withdrawal of *any one* asset closes the *entire* vault — deposits and
//! withdrawals of every asset are rejected afterwards, even when other
//! asset balances are still nonzero. Those balances remain parked at the
//! vault's ledger account with no path out. This asymmetry is deliberate
//! contract behavior; the stranding test in `tests/vault_lifecycle_test.rs`
//! pins it down.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use cofre_core::address::Address;
use cofre_core::asset::AssetId;
use cofre_core::config::{
    ALLOWED_ASSET_COUNT, EARLY_WITHDRAWAL_PENALTY_PERCENT, SECONDS_PER_DAY,
};
use cofre_core::ledger::{AssetLedger, LedgerError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// `initialize` was called on a vault that already ran its initializer.
    #[error("vault is already initialized")]
    AlreadyInitialized,

    /// The requested saving duration is zero (or too large to represent).
    #[error("invalid duration: {days} days")]
    InvalidDuration {
        /// The rejected duration.
        days: u64,
    },

    /// The vault is not accepting operations — either it was never
    /// initialized or it has been closed by a withdrawal.
    #[error("vault is not active")]
    NotActive,

    /// The asset is not in this vault's allow-list.
    #[error("asset not allowed: {0}")]
    AssetNotAllowed(AssetId),

    /// Zero-amount operations are rejected — they are no-ops and likely
    /// indicate a bug in the caller.
    #[error("zero-amount operations are not permitted")]
    ZeroAmount,

    /// Only the vault owner can withdraw.
    #[error("caller {caller} is not the vault owner")]
    NotOwner {
        /// The address that attempted the withdrawal.
        caller: Address,
    },

    /// Tried to withdraw more of an asset than the vault holds.
    #[error("insufficient vault balance: holds {available}, requested {requested}")]
    InsufficientBalance {
        /// The vault's balance of the asset.
        available: u64,
        /// The amount that was requested.
        requested: u64,
    },

    /// A vault-internal balance increment would overflow.
    #[error("vault balance overflow: current {current}, deposit {deposit}")]
    BalanceOverflow {
        /// Balance before the failed deposit.
        current: u64,
        /// The deposit that caused the overflow.
        deposit: u64,
    },

    /// The underlying ledger rejected a transfer (e.g. the depositor's
    /// approval does not cover the amount). Propagated unchanged.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// The lifecycle state of a vault.
///
/// Transitions are one-way: `Uninitialized -> Active` (initializer) and
/// `Active -> Closed` (first successful withdrawal). There is no way back
/// to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultStatus {
    /// Allocated by the factory but not yet initialized. All fields read
    /// as zero values, like untouched contract storage.
    Uninitialized,
    /// Accepting deposits and a single withdrawal.
    Active,
    /// Closed by a withdrawal. Every further deposit and withdrawal is
    /// rejected, permanently.
    Closed,
}

impl std::fmt::Display for VaultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VaultStatus::Uninitialized => write!(f, "Uninitialized"),
            VaultStatus::Active => write!(f, "Active"),
            VaultStatus::Closed => write!(f, "Closed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Vault
// ---------------------------------------------------------------------------

/// A single savings vault instance.
///
/// Vaults are created exclusively by the
/// [`VaultFactory`](crate::factory::VaultFactory), which allocates them in
/// its arena and runs the initializer. All time-sensitive operations take
/// the current instant as an argument — the vault never reads a clock
/// itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SavingsVault {
    /// The vault's own account on the asset ledger. Deposited funds are
    /// held here until withdrawal.
    address: Address,

    /// Lifecycle state. See [`VaultStatus`].
    status: VaultStatus,

    /// The only identity allowed to withdraw. Zero until initialized,
    /// immutable afterwards.
    owner: Address,

    /// Free-text label for what the owner is saving towards. Immutable.
    purpose: String,

    /// When the initializer ran.
    created_at: DateTime<Utc>,

    /// `created_at + duration_days * 86_400s`. Withdrawals at or after
    /// this instant carry no penalty.
    matures_at: DateTime<Utc>,

    /// The fixed set of asset kinds this vault accepts. Exactly
    /// [`ALLOWED_ASSET_COUNT`] entries, immutable.
    allowed_assets: [AssetId; ALLOWED_ASSET_COUNT],

    /// Internal balance book, asset -> amount. Mirrors the vault's ledger
    /// account split by asset.
    #[serde(with = "cofre_core::asset::asset_id_map")]
    balances: HashMap<AssetId, u64>,

    /// Receiver of the early-withdrawal penalty cut. Snapshotted from the
    /// factory's developer setting at creation time; later factory
    /// changes do not reach existing vaults.
    penalty_recipient: Address,
}

/// Receipt returned by a successful [`SavingsVault::withdraw`], with the
/// exact split the ledger executed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WithdrawalReceipt {
    /// The asset that was withdrawn.
    pub asset: AssetId,

    /// The amount deducted from the vault's balance.
    pub gross: u64,

    /// What the owner actually received (`gross - penalty`).
    pub paid_out: u64,

    /// What the penalty recipient received. Zero at or after maturity.
    pub penalty: u64,

    /// Whether the vault had reached maturity at withdrawal time.
    pub matured: bool,

    /// The instant the withdrawal was executed at.
    pub timestamp: DateTime<Utc>,
}

impl SavingsVault {
    /// Allocates a zeroed, uninitialized vault bound to `address`.
    ///
    /// Only the factory calls this; the instance is unusable until
    /// [`initialize`](Self::initialize) runs.
    pub(crate) fn uninitialized(address: Address) -> Self {
        Self {
            address,
            status: VaultStatus::Uninitialized,
            owner: Address::zero(),
            purpose: String::new(),
            created_at: DateTime::<Utc>::MIN_UTC,
            matures_at: DateTime::<Utc>::MIN_UTC,
            allowed_assets: [AssetId::from_bytes([0u8; 32]); ALLOWED_ASSET_COUNT],
            balances: HashMap::new(),
            penalty_recipient: Address::zero(),
        }
    }

    /// Runs the one-time initializer: fixes every immutable field and
    /// activates the vault.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::AlreadyInitialized`] on a second call and
    /// [`VaultError::InvalidDuration`] for a zero (or unrepresentably
    /// large) duration.
    pub fn initialize(
        &mut self,
        owner: Address,
        purpose: &str,
        duration_days: u64,
        allowed_assets: [AssetId; ALLOWED_ASSET_COUNT],
        penalty_recipient: Address,
        now: DateTime<Utc>,
    ) -> Result<(), VaultError> {
        if self.status != VaultStatus::Uninitialized {
            return Err(VaultError::AlreadyInitialized);
        }

        let duration_secs = duration_days
            .checked_mul(SECONDS_PER_DAY)
            .and_then(|secs| i64::try_from(secs).ok())
            .filter(|secs| *secs > 0)
            .ok_or(VaultError::InvalidDuration {
                days: duration_days,
            })?;

        self.owner = owner;
        self.purpose = purpose.to_string();
        self.created_at = now;
        self.matures_at = now + Duration::seconds(duration_secs);
        self.allowed_assets = allowed_assets;
        self.penalty_recipient = penalty_recipient;
        self.status = VaultStatus::Active;
        Ok(())
    }

    /// Deposits `amount` of `asset` into the vault.
    ///
    /// The caller must have approved the vault on the ledger beforehand;
    /// the vault pulls the funds into its own account and records them.
    /// Returns the vault's new balance of the asset.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotActive`] once the vault is closed (or
    /// before initialization), [`VaultError::AssetNotAllowed`] for assets
    /// outside the allow-list, [`VaultError::ZeroAmount`] for `amount == 0`,
    /// and propagates ledger failures (missing approval, insufficient
    /// caller balance) unchanged.
    pub fn deposit(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: u64,
        ledger: &mut AssetLedger,
    ) -> Result<u64, VaultError> {
        if self.status != VaultStatus::Active {
            return Err(VaultError::NotActive);
        }
        if !self.allowed_assets.contains(&asset) {
            return Err(VaultError::AssetNotAllowed(asset));
        }
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }

        let current = self.balance_of(asset);
        let new_balance = current
            .checked_add(amount)
            .ok_or(VaultError::BalanceOverflow {
                current,
                deposit: amount,
            })?;

        // Pull the funds first — if the caller's approval or balance falls
        // short, this fails and the vault records nothing.
        ledger.transfer_from(asset, self.address, caller, self.address, amount)?;

        self.balances.insert(asset, new_balance);
        Ok(new_balance)
    }

    /// Withdraws `amount` of `asset` to the owner and closes the vault.
    ///
    /// At or after maturity the owner receives the full amount. Before
    /// maturity, `floor(amount * 15 / 100)` goes to the penalty recipient
    /// and the owner receives the remainder — truncation favors the owner
    /// by at most one smallest unit.
    ///
    /// The close is unconditional: whichever asset is withdrawn, however
    /// much of it, the vault rejects every subsequent deposit and
    /// withdrawal. Balances of other assets stay stranded at the vault's
    /// ledger account.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotActive`], [`VaultError::NotOwner`],
    /// [`VaultError::ZeroAmount`], or [`VaultError::InsufficientBalance`];
    /// all checks run before any funds move.
    pub fn withdraw(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: u64,
        ledger: &mut AssetLedger,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalReceipt, VaultError> {
        if self.status != VaultStatus::Active {
            return Err(VaultError::NotActive);
        }
        if caller != self.owner {
            return Err(VaultError::NotOwner { caller });
        }
        if amount == 0 {
            return Err(VaultError::ZeroAmount);
        }

        let available = self.balance_of(asset);
        if amount > available {
            return Err(VaultError::InsufficientBalance {
                available,
                requested: amount,
            });
        }

        let matured = now >= self.matures_at;
        let penalty = if matured {
            0
        } else {
            // u128 intermediate: amount * 15 cannot overflow there, and the
            // result is <= amount so it always fits back into u64.
            ((amount as u128 * EARLY_WITHDRAWAL_PENALTY_PERCENT as u128) / 100) as u64
        };
        let paid_out = amount - penalty;

        // The vault's ledger account always holds at least the sum of its
        // recorded balances, so these transfers cannot fail once the
        // balance check above has passed.
        ledger.transfer(asset, self.address, self.owner, paid_out)?;
        if penalty > 0 {
            ledger.transfer(asset, self.address, self.penalty_recipient, penalty)?;
        }

        self.balances.insert(asset, available - amount);
        self.status = VaultStatus::Closed;

        Ok(WithdrawalReceipt {
            asset,
            gross: amount,
            paid_out,
            penalty,
            matured,
            timestamp: now,
        })
    }

    // -----------------------------------------------------------------------
    // Read-only queries
    // -----------------------------------------------------------------------

    /// The vault's account on the asset ledger.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The vault's balance of `asset`, or 0.
    pub fn balance_of(&self, asset: AssetId) -> u64 {
        self.balances.get(&asset).copied().unwrap_or(0)
    }

    /// `true` once the maturity instant has been reached.
    pub fn is_saving_complete(&self, now: DateTime<Utc>) -> bool {
        now >= self.matures_at
    }

    /// Seconds remaining until maturity; exactly 0 at or after it.
    pub fn time_until_maturity(&self, now: DateTime<Utc>) -> u64 {
        let remaining = (self.matures_at - now).num_seconds();
        remaining.max(0) as u64
    }

    /// What the owner is saving for.
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// `true` while the vault accepts deposits and a withdrawal.
    pub fn is_active(&self) -> bool {
        self.status == VaultStatus::Active
    }

    /// The lifecycle state.
    pub fn status(&self) -> VaultStatus {
        self.status
    }

    /// The withdrawal-entitled owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// The receiver of early-withdrawal penalties.
    pub fn penalty_recipient(&self) -> Address {
        self.penalty_recipient
    }

    /// When the vault was initialized.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The maturity instant.
    pub fn matures_at(&self) -> DateTime<Utc> {
        self.matures_at
    }

    /// The fixed allow-list of accepted assets.
    pub fn allowed_assets(&self) -> &[AssetId; ALLOWED_ASSET_COUNT] {
        &self.allowed_assets
    }
}
