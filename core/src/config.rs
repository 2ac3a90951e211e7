//! # System Configuration & Constants
//!
//! Every magic number in Cofre lives here. These values are part of the
//! address-derivation preimages and the vault economics, so changing any
//! of them after vaults exist will orphan every previously derived
//! address. Choose once, keep forever.

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// Human-readable prefix for all Cofre addresses (Bech32 HRP).
/// Short enough to type, distinctive enough to never be mistaken for a
/// raw hex blob.
pub const ADDRESS_HRP: &str = "cofre";

// ---------------------------------------------------------------------------
// Vault Economics
// ---------------------------------------------------------------------------

/// Penalty applied to withdrawals before maturity, in whole percent.
///
/// The penalty is computed as `floor(amount * 15 / 100)` — integer
/// truncation favors the owner by at most one smallest unit.
pub const EARLY_WITHDRAWAL_PENALTY_PERCENT: u64 = 15;

/// Seconds in a day. Vault durations are specified in whole days and
/// converted with this factor; maturity is `created_at + days * 86_400s`.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Number of asset kinds a vault accepts. The allow-list is fixed at
/// initialization and always has exactly this many entries.
pub const ALLOWED_ASSET_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// Address Derivation Domains
// ---------------------------------------------------------------------------
//
// Each derivation family gets its own BLAKE3 `derive_key` context so that
// outputs from different families can never collide, even on identical
// input bytes.

/// Version tag identifying the vault template logic. Hashed to produce the
/// factory's `implementation` address.
pub const VAULT_IMPLEMENTATION_TAG: &str = "cofre-savings-vault-v1";

/// Derivation context for the implementation address.
pub const DOMAIN_IMPLEMENTATION: &str = "cofre/implementation/v1";

/// Derivation context for factory addresses.
pub const DOMAIN_FACTORY: &str = "cofre/factory/v1";

/// Derivation context for sequentially created vaults (nonce-based).
pub const DOMAIN_VAULT_SEQUENTIAL: &str = "cofre/vault-create/v1";

/// Derivation context for deterministically created vaults (salt-based).
/// Kept separate from the sequential domain so a caller-chosen salt can
/// never front-run a nonce-derived address.
pub const DOMAIN_VAULT_SALTED: &str = "cofre/vault-create2/v1";
