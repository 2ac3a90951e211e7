//! Integration tests for the savings-vault system.
//!
//! These tests exercise the full factory-to-vault flow across module
//! boundaries the way a real deployment would run it: a shared asset
//! ledger, a manually advanced clock, vaults created through the factory,
//! and deposits/withdrawals moving actual ledger balances.

use chrono::Duration;

use cofre_contracts::factory::{FactoryError, VaultFactory};
use cofre_contracts::vault::{VaultError, VaultStatus};
use cofre_core::address::Address;
use cofre_core::asset::{dai, tether, usd_coin, AssetInfo};
use cofre_core::clock::Clock;
use cofre_core::hash::blake3_hash;
use cofre_core::ledger::AssetLedger;

const SAVING_PURPOSE: &str = "Test Saving";
const DURATION_DAYS: u64 = 90;

/// 100 units of a 6-decimal asset, in smallest units.
const DEPOSIT_AMOUNT: u64 = 100_000_000;
/// 2 units of 18-decimal DAI. At 18 decimals the smallest-unit amounts
/// approach `u64::MAX` fast — 18.4 DAI is the ceiling per account.
const DEPOSIT_AMOUNT_DAI: u64 = 2_000_000_000_000_000_000;

fn addr(seed: u8) -> Address {
    Address::from_bytes([seed; 32])
}

fn deployer() -> Address {
    addr(1)
}

fn owner() -> Address {
    addr(10)
}

/// A factory, a funded-and-approved ledger for `owner()`, and a fixed
/// clock — the standard test deployment.
fn setup() -> (VaultFactory, AssetLedger, Clock, Address) {
    let clock = Clock::fixed(chrono::Utc::now());
    let mut factory = VaultFactory::new(deployer());
    let vault_addr = factory
        .create_vault(owner(), SAVING_PURPOSE, DURATION_DAYS, clock.now())
        .unwrap()
        .vault;

    let mut ledger = AssetLedger::new();
    for asset in [tether().id, usd_coin().id] {
        ledger.mint(asset, owner(), 10 * DEPOSIT_AMOUNT).unwrap();
        ledger.approve(asset, owner(), vault_addr, 10 * DEPOSIT_AMOUNT);
    }
    ledger.mint(dai().id, owner(), 3 * DEPOSIT_AMOUNT_DAI).unwrap();
    ledger.approve(dai().id, owner(), vault_addr, 3 * DEPOSIT_AMOUNT_DAI);

    (factory, ledger, clock, vault_addr)
}

// ---------------------------------------------------------------------------
// Allow-List Enforcement
// ---------------------------------------------------------------------------

#[test]
fn accepts_deposits_of_all_three_allowed_assets() {
    let (mut factory, mut ledger, _clock, vault_addr) = setup();
    let vault = factory.vault_mut(vault_addr).unwrap();

    vault
        .deposit(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger)
        .unwrap();
    vault
        .deposit(owner(), usd_coin().id, DEPOSIT_AMOUNT, &mut ledger)
        .unwrap();
    vault
        .deposit(owner(), dai().id, DEPOSIT_AMOUNT_DAI, &mut ledger)
        .unwrap();

    assert_eq!(vault.balance_of(tether().id), DEPOSIT_AMOUNT);
    assert_eq!(vault.balance_of(usd_coin().id), DEPOSIT_AMOUNT);
    assert_eq!(vault.balance_of(dai().id), DEPOSIT_AMOUNT_DAI);
}

#[test]
fn rejects_deposits_of_unlisted_assets_on_every_vault() {
    let (mut factory, mut ledger, clock, first_vault) = setup();
    let second_vault = factory
        .create_vault(owner(), "Another", 30, clock.now())
        .unwrap()
        .vault;

    let rogue = AssetInfo::new("Not Allowed", "NOT", 18, "nowhere");
    ledger.mint(rogue.id, owner(), DEPOSIT_AMOUNT).unwrap();

    for vault_addr in [first_vault, second_vault] {
        ledger.approve(rogue.id, owner(), vault_addr, DEPOSIT_AMOUNT);
        let vault = factory.vault_mut(vault_addr).unwrap();
        let result = vault.deposit(owner(), rogue.id, DEPOSIT_AMOUNT, &mut ledger);
        assert!(matches!(result, Err(VaultError::AssetNotAllowed(_))));
    }
}

// ---------------------------------------------------------------------------
// Maturity Arithmetic
// ---------------------------------------------------------------------------

#[test]
fn time_until_maturity_decreases_and_bottoms_out_at_zero() {
    let (factory, _ledger, mut clock, vault_addr) = setup();
    let vault = factory.vault(vault_addr).unwrap();

    let full = vault.time_until_maturity(clock.now());
    assert_eq!(full, DURATION_DAYS * 24 * 60 * 60);
    assert!(!vault.is_saving_complete(clock.now()));

    clock.advance(Duration::days(45));
    let halfway = vault.time_until_maturity(clock.now());
    assert_eq!(halfway, full / 2);
    assert!(!vault.is_saving_complete(clock.now()));

    clock.advance(Duration::days(45));
    assert_eq!(vault.time_until_maturity(clock.now()), 0);
    assert!(vault.is_saving_complete(clock.now()));

    // Long past maturity it stays pinned at zero.
    clock.advance(Duration::days(400));
    assert_eq!(vault.time_until_maturity(clock.now()), 0);
}

#[test]
fn complete_iff_no_time_remaining() {
    let (factory, _ledger, mut clock, vault_addr) = setup();
    let vault = factory.vault(vault_addr).unwrap();

    for _ in 0..4 {
        let now = clock.now();
        assert_eq!(
            vault.is_saving_complete(now),
            vault.time_until_maturity(now) == 0
        );
        clock.advance(Duration::days(30));
    }
}

// ---------------------------------------------------------------------------
// Penalty Scenarios (100 units, 90-day duration)
// ---------------------------------------------------------------------------

#[test]
fn immediate_withdrawal_pays_85_and_penalizes_15() {
    let (mut factory, mut ledger, clock, vault_addr) = setup();
    let owner_before = ledger.balance_of(tether().id, owner());

    let vault = factory.vault_mut(vault_addr).unwrap();
    vault
        .deposit(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger)
        .unwrap();
    let receipt = vault
        .withdraw(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger, clock.now())
        .unwrap();

    let penalty = DEPOSIT_AMOUNT * 15 / 100;
    assert_eq!(receipt.penalty, penalty);
    assert_eq!(receipt.paid_out, DEPOSIT_AMOUNT - penalty);

    // 100 units left, 85 came back: net -15 on the owner's account.
    assert_eq!(
        ledger.balance_of(tether().id, owner()),
        owner_before - penalty
    );
    assert_eq!(ledger.balance_of(tether().id, deployer()), penalty);
    assert!(!vault.is_active());

    // Further deposits are rejected.
    let result = vault.deposit(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger);
    assert!(matches!(result, Err(VaultError::NotActive)));
}

#[test]
fn withdrawal_after_maturity_pays_in_full() {
    let (mut factory, mut ledger, mut clock, vault_addr) = setup();
    let owner_before = ledger.balance_of(tether().id, owner());

    factory
        .vault_mut(vault_addr)
        .unwrap()
        .deposit(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger)
        .unwrap();

    clock.advance(Duration::days(DURATION_DAYS as i64) + Duration::seconds(1));

    let vault = factory.vault_mut(vault_addr).unwrap();
    assert!(vault.is_saving_complete(clock.now()));

    let receipt = vault
        .withdraw(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger, clock.now())
        .unwrap();

    assert_eq!(receipt.penalty, 0);
    assert_eq!(receipt.paid_out, DEPOSIT_AMOUNT);
    assert!(receipt.matured);
    assert_eq!(ledger.balance_of(tether().id, owner()), owner_before);
    assert_eq!(ledger.balance_of(tether().id, deployer()), 0);
    assert!(!vault.is_active());
}

#[test]
fn only_the_owner_can_withdraw() {
    let (mut factory, mut ledger, clock, vault_addr) = setup();
    let vault = factory.vault_mut(vault_addr).unwrap();
    vault
        .deposit(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger)
        .unwrap();

    let intruder = addr(99);
    let result = vault.withdraw(intruder, tether().id, DEPOSIT_AMOUNT, &mut ledger, clock.now());
    assert!(matches!(result, Err(VaultError::NotOwner { caller }) if caller == intruder));
    assert!(vault.is_active());
}

// ---------------------------------------------------------------------------
// Single-Shot Closure
// ---------------------------------------------------------------------------

#[test]
fn early_withdrawal_of_one_asset_strands_the_rest() {
    let (mut factory, mut ledger, clock, vault_addr) = setup();
    let vault = factory.vault_mut(vault_addr).unwrap();

    vault
        .deposit(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger)
        .unwrap();
    vault
        .deposit(owner(), dai().id, DEPOSIT_AMOUNT_DAI, &mut ledger)
        .unwrap();

    // Withdrawing only the USDT closes the whole vault.
    vault
        .withdraw(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger, clock.now())
        .unwrap();
    assert_eq!(vault.status(), VaultStatus::Closed);

    // The DAI is still recorded and still sits at the vault's ledger
    // account, but there is no path to it: both withdrawal and deposit
    // are rejected forever.
    assert_eq!(vault.balance_of(dai().id), DEPOSIT_AMOUNT_DAI);
    assert_eq!(
        ledger.balance_of(dai().id, vault_addr),
        DEPOSIT_AMOUNT_DAI
    );
    assert!(matches!(
        vault.withdraw(owner(), dai().id, DEPOSIT_AMOUNT_DAI, &mut ledger, clock.now()),
        Err(VaultError::NotActive)
    ));
    assert!(matches!(
        vault.deposit(owner(), dai().id, 1, &mut ledger),
        Err(VaultError::NotActive)
    ));
}

#[test]
fn partial_withdrawal_still_closes_the_vault() {
    let (mut factory, mut ledger, clock, vault_addr) = setup();
    let vault = factory.vault_mut(vault_addr).unwrap();
    vault
        .deposit(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger)
        .unwrap();

    vault
        .withdraw(owner(), tether().id, DEPOSIT_AMOUNT / 4, &mut ledger, clock.now())
        .unwrap();

    // Three quarters remain recorded, stranded behind the closed status.
    assert_eq!(vault.balance_of(tether().id), DEPOSIT_AMOUNT * 3 / 4);
    assert!(!vault.is_active());
    assert!(matches!(
        vault.withdraw(owner(), tether().id, 1, &mut ledger, clock.now()),
        Err(VaultError::NotActive)
    ));
}

// ---------------------------------------------------------------------------
// Deterministic Creation
// ---------------------------------------------------------------------------

#[test]
fn predicted_address_matches_created_address() {
    let (mut factory, _ledger, clock, _) = setup();
    let salt = blake3_hash(b"test-salt");

    let predicted = factory.predict_vault_address(salt);
    let event = factory
        .create_vault_deterministic(owner(), SAVING_PURPOSE, DURATION_DAYS, salt, clock.now())
        .unwrap();

    assert_eq!(event.vault, predicted);
    let vault = factory.vault(event.vault).unwrap();
    assert_eq!(vault.purpose(), SAVING_PURPOSE);
    assert_eq!(vault.owner(), owner());
}

#[test]
fn salt_reuse_fails_without_side_effects() {
    let (mut factory, _ledger, clock, _) = setup();
    let salt = blake3_hash(b"reused");

    factory
        .create_vault_deterministic(owner(), "First", 30, salt, clock.now())
        .unwrap();
    let total_before = factory.total_vaults();
    let events_before = factory.events().len();

    let result = factory.create_vault_deterministic(addr(77), "Second", 30, salt, clock.now());
    assert!(matches!(result, Err(FactoryError::SaltAlreadyUsed { .. })));
    assert_eq!(factory.total_vaults(), total_before);
    assert_eq!(factory.events().len(), events_before);
    assert!(factory.vaults_by_creator(addr(77)).is_empty());
}

// ---------------------------------------------------------------------------
// Registry Consistency
// ---------------------------------------------------------------------------

#[test]
fn registries_track_creations_across_creators() {
    let clock = Clock::fixed(chrono::Utc::now());
    let mut factory = VaultFactory::new(deployer());

    let alice = addr(10);
    let bob = addr(11);

    let a1 = factory
        .create_vault(alice, "Vacation", 30, clock.now())
        .unwrap();
    let b1 = factory.create_vault(bob, "House", 365, clock.now()).unwrap();
    let a2 = factory
        .create_vault(alice, "Emergency", 60, clock.now())
        .unwrap();

    assert_eq!(factory.total_vaults(), 3);
    assert_eq!(factory.all_vaults(), &[a1.vault, b1.vault, a2.vault]);
    assert_eq!(factory.vaults_by_creator(alice), &[a1.vault, a2.vault]);
    assert_eq!(factory.vaults_by_creator(bob), &[b1.vault]);

    assert_eq!(factory.vault(a1.vault).unwrap().purpose(), "Vacation");
    assert_eq!(factory.vault(b1.vault).unwrap().purpose(), "House");
    assert_eq!(factory.vault(a2.vault).unwrap().purpose(), "Emergency");
}

// ---------------------------------------------------------------------------
// Developer Snapshot Semantics
// ---------------------------------------------------------------------------

#[test]
fn penalty_goes_to_the_developer_configured_at_creation_time() {
    let clock = Clock::fixed(chrono::Utc::now());
    let mut factory = VaultFactory::new(deployer());
    let new_developer = addr(33);

    let old_vault = factory
        .create_vault(owner(), "Before", DURATION_DAYS, clock.now())
        .unwrap()
        .vault;
    factory.set_developer(deployer(), new_developer).unwrap();
    let new_vault = factory
        .create_vault(owner(), "After", DURATION_DAYS, clock.now())
        .unwrap()
        .vault;

    let mut ledger = AssetLedger::new();
    ledger.mint(tether().id, owner(), 2 * DEPOSIT_AMOUNT).unwrap();
    ledger.approve(tether().id, owner(), old_vault, DEPOSIT_AMOUNT);
    ledger.approve(tether().id, owner(), new_vault, DEPOSIT_AMOUNT);

    for vault_addr in [old_vault, new_vault] {
        let vault = factory.vault_mut(vault_addr).unwrap();
        vault
            .deposit(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger)
            .unwrap();
        vault
            .withdraw(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger, clock.now())
            .unwrap();
    }

    let penalty = DEPOSIT_AMOUNT * 15 / 100;
    assert_eq!(ledger.balance_of(tether().id, deployer()), penalty);
    assert_eq!(ledger.balance_of(tether().id, new_developer), penalty);
}

// ---------------------------------------------------------------------------
// State Snapshots
// ---------------------------------------------------------------------------

#[test]
fn full_deployment_survives_a_serialization_roundtrip() {
    let (mut factory, mut ledger, clock, vault_addr) = setup();
    factory
        .vault_mut(vault_addr)
        .unwrap()
        .deposit(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger)
        .unwrap();

    let factory_json = serde_json::to_string(&factory).unwrap();
    let ledger_json = serde_json::to_string(&ledger).unwrap();

    let mut factory: VaultFactory = serde_json::from_str(&factory_json).unwrap();
    let mut ledger: AssetLedger = serde_json::from_str(&ledger_json).unwrap();

    // The restored deployment behaves like the one it was saved from: a matured
    // withdrawal pays out in full.
    let mut clock = clock;
    clock.advance(Duration::days(DURATION_DAYS as i64 + 1));
    let receipt = factory
        .vault_mut(vault_addr)
        .unwrap()
        .withdraw(owner(), tether().id, DEPOSIT_AMOUNT, &mut ledger, clock.now())
        .unwrap();
    assert_eq!(receipt.paid_out, DEPOSIT_AMOUNT);
    assert_eq!(receipt.penalty, 0);
}
