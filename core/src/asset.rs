//! # Asset Standard
//!
//! Defines the fungible asset kinds a vault can hold. Every asset is
//! represented as an [`AssetInfo`] with a unique [`AssetId`].
//!
//! Asset IDs are deterministic BLAKE3 hashes of the asset's canonical
//! properties (name, symbol, decimals, issuer). The same asset always gets
//! the same ID regardless of when or where it is registered — no registry
//! needed, no coordination required.
//!
//! ## Reference Assets
//!
//! The system ships with the three assets the reference vault allow-list
//! is built from: [`tether`] and [`usd_coin`] (6 decimals each) and
//! [`dai`] (18 decimals). Their issuer strings carry the origin-chain
//! contract address, which keeps the IDs stable and globally meaningful.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ALLOWED_ASSET_COUNT;
use crate::hash::blake3_hash;

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// A unique, content-addressed identifier for an asset kind.
///
/// Computed as `BLAKE3(name || symbol || decimals || issuer)` with
/// separator bytes between fields. Two assets with identical properties
/// always produce the same ID, making this a natural deduplication key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId([u8; 32]);

impl AssetId {
    /// Creates an `AssetId` from a raw 32-byte hash.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 32-byte identifier.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the hex-encoded asset ID.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a hex-encoded asset ID.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Derives an `AssetId` from the canonical asset properties.
    ///
    /// The hash input is the concatenation of:
    /// - `name` (UTF-8 bytes)
    /// - `0x00` separator
    /// - `symbol` (UTF-8 bytes)
    /// - `0x00` separator
    /// - `decimals` (single byte)
    /// - `0x00` separator
    /// - `issuer` (UTF-8 bytes)
    ///
    /// The separator bytes prevent ambiguity when one field's suffix
    /// matches another field's prefix.
    pub fn derive(name: &str, symbol: &str, decimals: u8, issuer: &str) -> Self {
        let mut preimage = Vec::with_capacity(name.len() + symbol.len() + issuer.len() + 4);
        preimage.extend_from_slice(name.as_bytes());
        preimage.push(0x00);
        preimage.extend_from_slice(symbol.as_bytes());
        preimage.push(0x00);
        preimage.push(decimals);
        preimage.push(0x00);
        preimage.extend_from_slice(issuer.as_bytes());

        Self(blake3_hash(&preimage))
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({}...)", &self.to_hex()[..12])
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for AssetId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ---------------------------------------------------------------------------
// Serde helper: serialize HashMap<AssetId, V> with hex-string keys
// ---------------------------------------------------------------------------

/// Serde helper module for serializing/deserializing `HashMap<AssetId, V>`
/// as a JSON object with hex-encoded string keys.
///
/// JSON requires map keys to be strings, but `AssetId` wraps `[u8; 32]`
/// which serde would serialize as an array. This module converts keys
/// to/from their hex representation so the map serializes correctly.
///
/// # Usage
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct MyStruct {
///     #[serde(with = "cofre_core::asset::asset_id_map")]
///     balances: HashMap<AssetId, u64>,
/// }
/// ```
pub mod asset_id_map {
    use super::AssetId;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    pub fn serialize<V, S>(map: &HashMap<AssetId, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut ser_map = serializer.serialize_map(Some(map.len()))?;
        for (key, value) in map {
            ser_map.serialize_entry(&key.to_hex(), value)?;
        }
        ser_map.end()
    }

    pub fn deserialize<'de, V, D>(deserializer: D) -> Result<HashMap<AssetId, V>, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let string_map: HashMap<String, V> = HashMap::deserialize(deserializer)?;
        string_map
            .into_iter()
            .map(|(key, value)| {
                AssetId::from_hex(&key)
                    .map(|id| (id, value))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// AssetInfo
// ---------------------------------------------------------------------------

/// Complete metadata for an asset kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetInfo {
    /// Content-addressed identifier derived from this asset's properties.
    pub id: AssetId,

    /// Human-readable asset name (e.g., "Tether USD").
    pub name: String,

    /// Trading symbol / ticker (e.g., "USDT").
    pub symbol: String,

    /// Number of decimal places for display purposes.
    ///
    /// An asset with `decimals = 6` and raw amount `100_000_000` displays
    /// as `100.0`. The ledger never performs division — this is purely
    /// for UI rendering.
    pub decimals: u8,

    /// Origin identifier for the backing asset. For bridged stablecoins
    /// this is the origin-chain contract address, which pins the ID to a
    /// specific real-world asset.
    pub issuer: String,
}

impl AssetInfo {
    /// Creates a new [`AssetInfo`] with a deterministically derived
    /// [`AssetId`]. This is the only correct way to construct one — it
    /// ensures the ID is always consistent with the asset's properties.
    pub fn new(name: &str, symbol: &str, decimals: u8, issuer: &str) -> Self {
        Self {
            id: AssetId::derive(name, symbol, decimals, issuer),
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            issuer: issuer.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reference Assets
// ---------------------------------------------------------------------------

/// Tether USD — 6 decimal places, the workhorse stablecoin.
pub fn tether() -> AssetInfo {
    AssetInfo::new(
        "Tether USD",
        "USDT",
        6,
        "ethereum:0xdAC17F958D2ee523a2206206994597C13D831ec7",
    )
}

/// USD Coin — 6 decimal places.
pub fn usd_coin() -> AssetInfo {
    AssetInfo::new(
        "USD Coin",
        "USDC",
        6,
        "ethereum:0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
    )
}

/// Dai Stablecoin — 18 decimal places, the odd one out. Amounts in the
/// smallest unit get large fast: 100 DAI is `100 * 10^18`.
pub fn dai() -> AssetInfo {
    AssetInfo::new(
        "Dai Stablecoin",
        "DAI",
        18,
        "ethereum:0x6B175474E89094C44Da98b954EedeAC495271d0F",
    )
}

/// The fixed allow-list every reference vault is initialized with:
/// USDT, USDC (6 decimals), and DAI (18 decimals), in that order.
pub fn default_allow_list() -> [AssetId; ALLOWED_ASSET_COUNT] {
    [tether().id, usd_coin().id, dai().id]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
