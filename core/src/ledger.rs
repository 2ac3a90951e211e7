//! # Asset Ledger
//!
//! The external balance books the vault system moves money through. A
//! vault never holds raw funds itself — it holds an *account* on this
//! ledger, and deposits/withdrawals are instructions to move balances
//! between the caller's account, the vault's account, and the penalty
//! recipient's account.
//!
//! The ledger implements the standard two-step pull pattern: an owner
//! first `approve`s a spender for an amount, then the spender calls
//! `transfer_from` to pull funds into a destination account. This is how
//! a vault takes custody of a deposit without ever being handed the
//! owner's keys.
//!
//! Every operation either completes fully or fails with no state change:
//! all checks run before the first mutation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::address::Address;
use crate::asset::AssetId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Attempted to move more than the account holds.
    #[error("insufficient balance: account {account} holds {available}, requested {requested}")]
    InsufficientBalance {
        /// The account being debited.
        account: Address,
        /// The current balance.
        available: u64,
        /// The amount that was requested.
        requested: u64,
    },

    /// A `transfer_from` exceeded the spender's approved allowance.
    #[error("insufficient allowance: approved {approved}, requested {requested}")]
    InsufficientAllowance {
        /// The currently approved amount.
        approved: u64,
        /// The amount the spender tried to pull.
        requested: u64,
    },

    /// Arithmetic overflow during a credit operation.
    ///
    /// If you're hitting this, someone is trying to credit more than
    /// 18.4 quintillion smallest units. That's either a bug or an attack.
    #[error("balance overflow: account {account} holds {current}, credit {credit}")]
    Overflow {
        /// The account being credited.
        account: Address,
        /// The balance before the failed credit.
        current: u64,
        /// The amount that caused the overflow.
        credit: u64,
    },
}

// ---------------------------------------------------------------------------
// AssetLedger
// ---------------------------------------------------------------------------

/// Per-asset, per-account balance books with pull-payment allowances.
///
/// Balances are `asset -> (account -> amount)`; allowances are
/// `asset -> (owner -> (spender -> amount))`. Missing entries read as
/// zero, so accounts never need explicit registration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AssetLedger {
    /// Account balances indexed by asset.
    #[serde(with = "crate::asset::asset_id_map")]
    balances: HashMap<AssetId, HashMap<Address, u64>>,

    /// Pull-payment approvals: `owner -> spender -> amount`, per asset.
    /// `approve` sets (not increments) the spender's entry.
    #[serde(with = "crate::asset::asset_id_map")]
    allowances: HashMap<AssetId, HashMap<Address, HashMap<Address, u64>>>,
}

impl AssetLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `account` for the given asset, or 0.
    pub fn balance_of(&self, asset: AssetId, account: Address) -> u64 {
        self.balances
            .get(&asset)
            .and_then(|accounts| accounts.get(&account))
            .copied()
            .unwrap_or(0)
    }

    /// Returns the amount `spender` may currently pull from `owner`, or 0.
    pub fn allowance(&self, asset: AssetId, owner: Address, spender: Address) -> u64 {
        self.allowances
            .get(&asset)
            .and_then(|owners| owners.get(&owner))
            .and_then(|spenders| spenders.get(&spender))
            .copied()
            .unwrap_or(0)
    }

    /// Credits `amount` of `asset` to `to` out of thin air.
    ///
    /// This is the on-ramp: test fixtures and the sandbox use it to fund
    /// accounts. Returns the new balance.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Overflow`] if the credit would exceed
    /// `u64::MAX`.
    pub fn mint(&mut self, asset: AssetId, to: Address, amount: u64) -> Result<u64, LedgerError> {
        let balance = self
            .balances
            .entry(asset)
            .or_default()
            .entry(to)
            .or_insert(0);

        let new_balance = balance.checked_add(amount).ok_or(LedgerError::Overflow {
            account: to,
            current: *balance,
            credit: amount,
        })?;

        *balance = new_balance;
        Ok(new_balance)
    }

    /// Sets the amount `spender` may pull from `owner`.
    ///
    /// Overwrites any previous approval: this is a set, not an increment,
    /// the standard pull-payment convention.
    pub fn approve(&mut self, asset: AssetId, owner: Address, spender: Address, amount: u64) {
        self.allowances
            .entry(asset)
            .or_default()
            .entry(owner)
            .or_default()
            .insert(spender, amount);
    }

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// All checks run before any mutation: on failure, both accounts are
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if `from` holds less
    /// than `amount`. Returns [`LedgerError::Overflow`] if crediting `to`
    /// would overflow.
    pub fn transfer(
        &mut self,
        asset: AssetId,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let from_balance = self.balance_of(asset, from);
        let debited = from_balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: from,
                available: from_balance,
                requested: amount,
            })?;

        // Self-transfers must not double-count: the credit is computed
        // against the post-debit balance.
        let to_balance = if from == to {
            debited
        } else {
            self.balance_of(asset, to)
        };
        let credited = to_balance.checked_add(amount).ok_or(LedgerError::Overflow {
            account: to,
            current: to_balance,
            credit: amount,
        })?;

        let accounts = self.balances.entry(asset).or_default();
        accounts.insert(from, debited);
        accounts.insert(to, credited);
        Ok(())
    }

    /// Pulls `amount` of `asset` from `owner` into `to`, on behalf of
    /// `spender`, consuming the spender's allowance.
    ///
    /// The allowance is checked first and decremented only after the
    /// transfer succeeds, so a failed transfer leaves the approval intact.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientAllowance`] if the spender's
    /// approval does not cover `amount`; otherwise the same errors as
    /// [`transfer`](Self::transfer).
    pub fn transfer_from(
        &mut self,
        asset: AssetId,
        spender: Address,
        owner: Address,
        to: Address,
        amount: u64,
    ) -> Result<(), LedgerError> {
        let approved = self.allowance(asset, owner, spender);
        if approved < amount {
            return Err(LedgerError::InsufficientAllowance {
                approved,
                requested: amount,
            });
        }

        self.transfer(asset, owner, to, amount)?;

        self.allowances
            .entry(asset)
            .or_default()
            .entry(owner)
            .or_default()
            .insert(spender, approved - amount);
        Ok(())
    }
}
