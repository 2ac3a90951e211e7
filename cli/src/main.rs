// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Cofre Sandbox CLI
//!
//! Entry point for the `cofre` binary. Wires an in-memory asset ledger, a
//! vault factory, and a fixed clock into a complete sandbox deployment
//! and drives it from the command line.
//!
//! The binary supports three subcommands:
//!
//! - `demo`    — run the full deposit/withdraw/penalty flow end to end
//! - `predict` — compute the address a salted creation would produce
//! - `version` — print build version information

mod cli;
mod logging;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::Parser;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;

use cofre_contracts::factory::VaultFactory;
use cofre_core::address::Address;
use cofre_core::asset::{tether, usd_coin};
use cofre_core::clock::Clock;
use cofre_core::hash::blake3_hash;
use cofre_core::ledger::AssetLedger;

use cli::{CofreCli, Commands, DemoArgs, PredictArgs};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = CofreCli::parse();

    match cli.command {
        Commands::Demo(args) => run_demo(args),
        Commands::Predict(args) => predict(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Generates a fresh Ed25519 identity and returns its address.
fn generate_identity() -> Address {
    let key = SigningKey::generate(&mut OsRng);
    Address::from_public_key(&key.verifying_key())
}

/// Runs the end-to-end sandbox flow:
///
/// 1. Deploy a factory and fund an owner account on the ledger.
/// 2. Create a vault, deposit, withdraw immediately — the 15% penalty
///    lands at the developer address.
/// 3. Create a second vault, deposit, fast-forward the clock past
///    maturity, withdraw — no penalty this time.
fn run_demo(args: DemoArgs) -> Result<()> {
    logging::init_logging(
        "cofre=info,cofre_contracts=info",
        LogFormat::from_str_lossy(&args.log_format),
    );

    let mut clock = Clock::fixed(chrono::Utc::now());
    let mut ledger = AssetLedger::new();

    let deployer = generate_identity();
    let owner = generate_identity();
    let mut factory = VaultFactory::new(deployer);

    tracing::info!(
        factory = %factory.address(),
        implementation = %factory.implementation(),
        developer = %factory.developer(),
        "factory deployed"
    );

    let usdt = tether();
    let decimals_factor = 10u64.pow(usdt.decimals as u32);
    let deposit = args
        .amount
        .checked_mul(decimals_factor)
        .context("deposit amount does not fit into 64 bits at 6 decimals")?;

    // Fund the owner with enough for both vaults.
    ledger
        .mint(usdt.id, owner, 2 * deposit)
        .context("funding the owner account")?;

    println!("Deployment");
    println!("  Factory        : {}", factory.address());
    println!("  Implementation : {}", factory.implementation());
    println!("  Developer      : {}", factory.developer());
    println!("  Owner          : {}", owner);
    println!();

    // --- Vault 1: early withdrawal, penalty applies ---
    let event = factory.create_vault(owner, &args.purpose, args.duration_days, clock.now())?;
    let vault_addr = event.vault;

    ledger.approve(usdt.id, owner, vault_addr, deposit);
    let vault = factory
        .vault_mut(vault_addr)
        .expect("just-created vault is in the arena");
    vault.deposit(owner, usdt.id, deposit, &mut ledger)?;
    let receipt = vault.withdraw(owner, usdt.id, deposit, &mut ledger, clock.now())?;

    println!("Vault 1 — \"{}\", withdrawn immediately", args.purpose);
    println!("  Address   : {}", vault_addr);
    println!("  Deposited : {} {}", format_units(deposit, usdt.decimals), usdt.symbol);
    println!(
        "  Paid out  : {} {}",
        format_units(receipt.paid_out, usdt.decimals),
        usdt.symbol
    );
    println!(
        "  Penalty   : {} {} -> {}",
        format_units(receipt.penalty, usdt.decimals),
        usdt.symbol,
        factory.developer()
    );
    println!();

    // --- Vault 2: withdrawal after maturity, no penalty ---
    let event = factory.create_vault(owner, &args.purpose, args.duration_days, clock.now())?;
    let vault_addr = event.vault;

    ledger.approve(usdt.id, owner, vault_addr, deposit);
    let vault = factory
        .vault_mut(vault_addr)
        .expect("just-created vault is in the arena");
    vault.deposit(owner, usdt.id, deposit, &mut ledger)?;

    clock.advance(Duration::days(args.duration_days as i64) + Duration::seconds(1));
    tracing::info!(days = args.duration_days, "clock advanced past maturity");

    let vault = factory
        .vault_mut(vault_addr)
        .expect("just-created vault is in the arena");
    let receipt = vault.withdraw(owner, usdt.id, deposit, &mut ledger, clock.now())?;

    println!(
        "Vault 2 — \"{}\", withdrawn after {} days",
        args.purpose, args.duration_days
    );
    println!("  Address   : {}", vault_addr);
    println!(
        "  Paid out  : {} {} (matured: {})",
        format_units(receipt.paid_out, usdt.decimals),
        usdt.symbol,
        receipt.matured
    );
    println!();

    println!("Registry");
    println!("  Total vaults  : {}", factory.total_vaults());
    println!(
        "  Owner's vaults: {}",
        factory.vaults_by_creator(owner).len()
    );
    println!(
        "  Owner balance : {} {}",
        format_units(ledger.balance_of(usdt.id, owner), usdt.decimals),
        usdt.symbol
    );

    Ok(())
}

/// Computes and prints the address a salted creation would produce.
fn predict(args: PredictArgs) -> Result<()> {
    let deployer = args.deployer.unwrap_or_else(Address::zero);
    let factory = VaultFactory::new(deployer);
    let salt = blake3_hash(args.salt.as_bytes());

    println!("Factory        : {}", factory.address());
    println!("Implementation : {}", factory.implementation());
    println!("Salt (BLAKE3)  : {}", hex::encode(salt));
    println!("Vault address  : {}", factory.predict_vault_address(salt));
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("cofre {}", env!("CARGO_PKG_VERSION"));
    println!(
        "assets: {} / {} (6 decimals), DAI (18 decimals)",
        tether().symbol,
        usd_coin().symbol
    );
}

/// Renders a smallest-unit amount with a decimal point for display.
/// The ledger itself never divides — this is presentation only.
fn format_units(amount: u64, decimals: u8) -> String {
    let factor = 10u128.pow(decimals as u32);
    let whole = amount as u128 / factor;
    let frac = amount as u128 % factor;
    if frac == 0 {
        format!("{}", whole)
    } else {
        let digits = format!("{:0width$}", frac, width = decimals as usize);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }
}
