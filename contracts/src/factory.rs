//! # Vault Factory Contract
//!
//! Creates [`SavingsVault`] instances and keeps the books on every one of
//! them. All vaults share a single logic template — the factory holds the
//! template's identity (`implementation`) and an arena of per-instance
//! state keyed by vault address, so behavior lives in one place and each
//! instance is nothing but its state record.
//!
//! Two creation paths exist:
//!
//! - **Sequential** — the address is derived from the factory's internal
//!   creation counter. Cheap, but callers learn the address only from the
//!   returned [`VaultCreated`] record.
//! - **Deterministic** — the address is derived from a caller-supplied
//!   salt, independent of creation order. [`predict_vault_address`]
//!   computes the identical address without creating anything, so callers
//!   can know where a vault *will* live before it exists. Reusing a salt
//!   fails: the address is already taken.
//!
//! Both paths funnel through one shared derivation function; the
//! prediction is bit-exact by construction, not by careful duplication.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

use cofre_core::address::Address;
use cofre_core::asset::default_allow_list;
use cofre_core::config::{
    DOMAIN_FACTORY, DOMAIN_IMPLEMENTATION, DOMAIN_VAULT_SALTED, DOMAIN_VAULT_SEQUENTIAL,
    VAULT_IMPLEMENTATION_TAG,
};
use cofre_core::hash::domain_separated_hash;

use crate::events::VaultCreated;
use crate::vault::{SavingsVault, VaultError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during factory operations.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Only the factory's deployer may change the developer address.
    #[error("caller {caller} is not the factory deployer")]
    NotDeployer {
        /// The address that attempted the change.
        caller: Address,
    },

    /// A deterministic creation reused a salt: a vault already exists at
    /// the derived address.
    #[error("a vault was already created at this salt (address {address})")]
    SaltAlreadyUsed {
        /// The occupied address the salt derives to.
        address: Address,
    },

    /// Vault initialization rejected the creation parameters. Nothing was
    /// created or registered.
    #[error("vault error: {0}")]
    Vault(#[from] VaultError),
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// The vault factory: template identity, instance arena, and registries.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultFactory {
    /// The factory's own address, part of every vault-address preimage.
    address: Address,

    /// Identity of the logic template all vaults share. Fixed at
    /// construction.
    implementation: Address,

    /// The identity that constructed the factory. Only it can change the
    /// developer address.
    deployer: Address,

    /// Receiver of early-withdrawal penalties for vaults created from now
    /// on. Each vault snapshots this value at its creation; changing it
    /// never affects existing vaults.
    developer: Address,

    /// Creation counter feeding the sequential derivation path.
    nonce: u64,

    /// Per-instance state, keyed by vault address.
    vaults: HashMap<Address, SavingsVault>,

    /// Every vault ever created, in creation order.
    all_vaults: Vec<Address>,

    /// Per-creator index, each list in creation order.
    vaults_by_creator: HashMap<Address, Vec<Address>>,

    /// Append-only log of creation events.
    events: Vec<VaultCreated>,
}

impl VaultFactory {
    /// Constructs a factory. The deployer starts out as the developer
    /// (penalty recipient) and can hand that role off later via
    /// [`set_developer`](Self::set_developer).
    pub fn new(deployer: Address) -> Self {
        let implementation = Address::from_bytes(domain_separated_hash(
            DOMAIN_IMPLEMENTATION,
            VAULT_IMPLEMENTATION_TAG.as_bytes(),
        ));

        // Fixed-width fields, so plain concatenation is unambiguous.
        let mut preimage = Vec::with_capacity(64);
        preimage.extend_from_slice(deployer.as_bytes());
        preimage.extend_from_slice(implementation.as_bytes());
        let address = Address::from_bytes(domain_separated_hash(DOMAIN_FACTORY, &preimage));

        Self {
            address,
            implementation,
            deployer,
            developer: deployer,
            nonce: 0,
            vaults: HashMap::new(),
            all_vaults: Vec::new(),
            vaults_by_creator: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// The one derivation everything address-related goes through:
    /// `BLAKE3_derive_key(domain, factory || implementation || discriminator)`.
    /// The discriminator is the creation counter (sequential path) or the
    /// caller's salt (deterministic path); the domain keeps the two
    /// families collision-free.
    fn derive_vault_address(&self, domain: &str, discriminator: &[u8; 32]) -> Address {
        let mut preimage = Vec::with_capacity(96);
        preimage.extend_from_slice(self.address.as_bytes());
        preimage.extend_from_slice(self.implementation.as_bytes());
        preimage.extend_from_slice(discriminator);
        Address::from_bytes(domain_separated_hash(domain, &preimage))
    }

    /// Creates a vault at the next sequential address.
    ///
    /// The vault is initialized with the caller as owner, the fixed
    /// reference allow-list, and the factory's *current* developer as
    /// penalty recipient. Returns the creation record; the address in it
    /// is how the caller finds the new vault.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::Vault`] if initialization rejects the
    /// parameters (zero duration); nothing is registered in that case and
    /// the creation counter does not advance.
    pub fn create_vault(
        &mut self,
        creator: Address,
        purpose: &str,
        duration_days: u64,
        now: DateTime<Utc>,
    ) -> Result<VaultCreated, FactoryError> {
        let mut discriminator = [0u8; 32];
        discriminator[..8].copy_from_slice(&self.nonce.to_le_bytes());
        let address = self.derive_vault_address(DOMAIN_VAULT_SEQUENTIAL, &discriminator);

        let event = self.instantiate(address, creator, purpose, duration_days, now)?;
        self.nonce += 1;
        Ok(event)
    }

    /// Creates a vault at the address [`predict_vault_address`] computes
    /// for `salt` — independent of how many vaults exist or will exist.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::SaltAlreadyUsed`] if this factory already
    /// created a vault from the same salt, and [`FactoryError::Vault`] for
    /// rejected parameters. Either way, nothing is created or registered.
    pub fn create_vault_deterministic(
        &mut self,
        creator: Address,
        purpose: &str,
        duration_days: u64,
        salt: [u8; 32],
        now: DateTime<Utc>,
    ) -> Result<VaultCreated, FactoryError> {
        let address = self.predict_vault_address(salt);
        if self.vaults.contains_key(&address) {
            return Err(FactoryError::SaltAlreadyUsed { address });
        }
        self.instantiate(address, creator, purpose, duration_days, now)
    }

    /// Computes the address [`create_vault_deterministic`] would produce
    /// for `salt`. Pure: no state is read besides the factory's fixed
    /// identity, no state is changed.
    pub fn predict_vault_address(&self, salt: [u8; 32]) -> Address {
        self.derive_vault_address(DOMAIN_VAULT_SALTED, &salt)
    }

    /// Shared tail of both creation paths: allocate, initialize, register,
    /// record.
    fn instantiate(
        &mut self,
        address: Address,
        creator: Address,
        purpose: &str,
        duration_days: u64,
        now: DateTime<Utc>,
    ) -> Result<VaultCreated, FactoryError> {
        let mut vault = SavingsVault::uninitialized(address);
        vault.initialize(
            creator,
            purpose,
            duration_days,
            default_allow_list(),
            self.developer,
            now,
        )?;

        self.vaults.insert(address, vault);
        self.all_vaults.push(address);
        self.vaults_by_creator
            .entry(creator)
            .or_default()
            .push(address);

        let event = VaultCreated {
            vault: address,
            creator,
            purpose: purpose.to_string(),
        };
        tracing::info!(
            vault = %event.vault,
            creator = %event.creator,
            purpose = %event.purpose,
            "vault created"
        );
        self.events.push(event.clone());
        Ok(event)
    }

    /// Replaces the developer address for all *future* creations. Already
    /// created vaults keep the penalty recipient they were born with.
    ///
    /// # Errors
    ///
    /// Returns [`FactoryError::NotDeployer`] unless `caller` is the
    /// factory's deployer.
    pub fn set_developer(
        &mut self,
        caller: Address,
        new_developer: Address,
    ) -> Result<(), FactoryError> {
        if caller != self.deployer {
            return Err(FactoryError::NotDeployer { caller });
        }
        self.developer = new_developer;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read-only queries
    // -----------------------------------------------------------------------

    /// The factory's own address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The shared logic template's identity.
    pub fn implementation(&self) -> Address {
        self.implementation
    }

    /// The identity that constructed the factory.
    pub fn deployer(&self) -> Address {
        self.deployer
    }

    /// The current penalty recipient for future creations.
    pub fn developer(&self) -> Address {
        self.developer
    }

    /// Total number of vaults ever created.
    pub fn total_vaults(&self) -> usize {
        self.all_vaults.len()
    }

    /// The address of the `index`-th created vault, in creation order.
    pub fn vault_address_at(&self, index: usize) -> Option<Address> {
        self.all_vaults.get(index).copied()
    }

    /// Every vault address, in creation order.
    pub fn all_vaults(&self) -> &[Address] {
        &self.all_vaults
    }

    /// The vaults `creator` has created, in creation order.
    pub fn vaults_by_creator(&self, creator: Address) -> &[Address] {
        self.vaults_by_creator
            .get(&creator)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// `true` if a vault exists at `address`.
    pub fn contains(&self, address: Address) -> bool {
        self.vaults.contains_key(&address)
    }

    /// Read access to a vault's state.
    pub fn vault(&self, address: Address) -> Option<&SavingsVault> {
        self.vaults.get(&address)
    }

    /// Write access to a vault's state — how callers deposit into and
    /// withdraw from their vaults.
    pub fn vault_mut(&mut self, address: Address) -> Option<&mut SavingsVault> {
        self.vaults.get_mut(&address)
    }

    /// The append-only creation-event log, oldest first.
    pub fn events(&self) -> &[VaultCreated] {
        &self.events
    }
}
