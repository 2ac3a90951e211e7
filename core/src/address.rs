//! # Addresses
//!
//! An [`Address`] is the handle for everything that can hold or move value
//! in Cofre: user identities, vault instances, factories, and the logic
//! template itself. It is a 32-byte BLAKE3 digest rendered as a Bech32
//! string with the `cofre` human-readable prefix:
//!
//! ```text
//! public_key (32 bytes)
//!     -> BLAKE3(public_key) -> 32 bytes
//!     -> Bech32("cofre", hash) -> cofre1qw508d6qe...
//! ```
//!
//! User addresses hash an Ed25519 public key; contract addresses are
//! derived hashes produced by the factory (see the contracts crate). Both
//! kinds are indistinguishable on the wire, which is the point — the
//! ledger does not care who is a human and who is a vault.
//!
//! Bech32 encoding provides built-in error detection (up to 4 character
//! errors), which matters when users copy-paste addresses into payment
//! forms.

use bech32::{Bech32, Hrp};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

use crate::config::ADDRESS_HRP;
use crate::hash::blake3_hash;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when parsing an address string.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The Bech32 string could not be decoded.
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The decoded address has an unexpected human-readable prefix.
    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp {
        /// The expected HRP.
        expected: String,
        /// The HRP that was actually found.
        got: String,
    },

    /// The decoded data has an unexpected length.
    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 32-byte account handle, Bech32-encoded for display.
///
/// `Address` is `Copy` on purpose: it is passed around constantly (caller
/// checks, registry keys, ledger accounts) and a 32-byte copy is cheaper
/// than the aliasing questions a reference would raise.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 32]);

impl Address {
    /// Creates an address from a raw 32-byte hash.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The all-zero address. Used as the pre-initialization placeholder in
    /// cloned contract state, the same way zeroed storage reads before an
    /// initializer runs. No keypair hashes to it.
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns the raw 32-byte hash underlying this address.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derives the address of an Ed25519 identity.
    ///
    /// Hashes the public key bytes with BLAKE3. The indirection (hash
    /// instead of raw key) keeps address length independent of any future
    /// key-scheme change.
    pub fn from_public_key(pk: &VerifyingKey) -> Self {
        Self(blake3_hash(pk.as_bytes()))
    }

    /// Encodes this address as a Bech32 string (`cofre1...`).
    pub fn to_bech32(&self) -> String {
        let hrp = Hrp::parse(ADDRESS_HRP).expect("static HRP is valid");
        bech32::encode::<Bech32>(hrp, &self.0)
            .expect("encoding a 32-byte payload should never fail")
    }

    /// Parses a Bech32-encoded address string.
    ///
    /// Validates the HRP, checksum, and data length.
    pub fn from_bech32(addr: &str) -> Result<Self, AddressError> {
        let (hrp, data) =
            bech32::decode(addr).map_err(|e| AddressError::Bech32Decode(e.to_string()))?;

        let expected_hrp = Hrp::parse(ADDRESS_HRP).expect("static HRP is valid");
        if hrp != expected_hrp {
            return Err(AddressError::InvalidHrp {
                expected: ADDRESS_HRP.to_string(),
                got: hrp.to_string(),
            });
        }

        if data.len() != 32 {
            return Err(AddressError::InvalidDataLength {
                expected: 32,
                got: data.len(),
            });
        }

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&data);
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bech32())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Full Bech32 is 60+ characters; the first 16 are plenty to
        // eyeball-match in a debug dump.
        write!(f, "Address({}...)", &self.to_bech32()[..16])
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s)
    }
}

// Serialize as the Bech32 string so that `HashMap<Address, V>` becomes a
// plain JSON object. The raw-array representation would be rejected by
// serde_json as a map key.
impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_bech32())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_bech32(&s).map_err(serde::de::Error::custom)
    }
}
