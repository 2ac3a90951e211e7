//! # CLI Interface
//!
//! Defines the command-line argument structure for the `cofre` binary
//! using `clap` derive. Three subcommands: `demo`, `predict`, and
//! `version`.

use clap::{Parser, Subcommand};

use cofre_core::address::Address;

/// Cofre savings-vault sandbox.
///
/// Runs an in-process deployment of the vault factory and asset ledger so
/// the full deposit/withdraw/penalty flow can be exercised from a shell,
/// without any network or chain behind it.
#[derive(Parser, Debug)]
#[command(
    name = "cofre",
    about = "Cofre savings-vault sandbox",
    version,
    propagate_version = true
)]
pub struct CofreCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the Cofre binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the end-to-end demo: create vaults, deposit, withdraw early
    /// (with penalty) and at maturity (without).
    Demo(DemoArgs),
    /// Predict the address a salted vault creation would produce.
    Predict(PredictArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `demo` subcommand.
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Saving purpose label for the demo vaults.
    #[arg(long, default_value = "Test Saving")]
    pub purpose: String,

    /// Saving duration in days.
    #[arg(long, default_value_t = 90)]
    pub duration_days: u64,

    /// Deposit amount in whole USDT units (6 decimals are applied
    /// internally).
    #[arg(long, default_value_t = 100)]
    pub amount: u64,

    /// Log output format: "pretty" or "json".
    #[arg(long, env = "COFRE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `predict` subcommand.
#[derive(Parser, Debug)]
pub struct PredictArgs {
    /// Salt string. Hashed with BLAKE3 to the 32-byte salt the factory
    /// derivation consumes, so any text works.
    #[arg(long)]
    pub salt: String,

    /// Deployer address the factory identity is derived from
    /// (Bech32 `cofre1...`). Defaults to the zero address.
    #[arg(long)]
    pub deployer: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        CofreCli::command().debug_assert();
    }
}
