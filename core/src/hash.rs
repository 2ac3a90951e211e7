//! # Hashing Utilities
//!
//! BLAKE3 is the only hash function in Cofre. It is fast on every platform
//! that matters, resistant to length extension by construction, and its
//! `derive_key` mode gives us proper domain separation without manual tag
//! prefixing.
//!
//! Everything content-addressed in the system — asset identifiers, contract
//! addresses, the implementation template identity — flows through the
//! functions in this module, which makes them the one place where a change
//! would silently orphan every existing address. Treat them as frozen.

/// Compute the BLAKE3 hash of the input data.
///
/// Returns a 32-byte digest as a fixed-size array. The `blake3` crate
/// automatically takes advantage of SIMD instructions on supported
/// platforms, so this is as fast as hashing gets.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}

/// Hash multiple byte slices together without concatenation overhead.
///
/// Instead of allocating a buffer to concatenate inputs, we feed them
/// sequentially into the hasher. Same result, less allocation. Useful for
/// hashing composite structures like `(factory || implementation || salt)`
/// without the temporary buffer.
///
/// Note that this is equivalent to hashing the plain concatenation — it
/// does NOT delimit the parts. Callers that need unambiguous field
/// boundaries must insert separator bytes themselves.
pub fn blake3_hash_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

/// Compute a domain-separated hash using BLAKE3 with a context string.
///
/// Domain separation prevents hash collisions across different protocol
/// contexts: `domain_separated_hash("cofre/vault-create/v1", data)` and
/// `domain_separated_hash("cofre/vault-create2/v1", data)` will never
/// collide even for identical `data`, because the context string selects
/// a different internal IV.
///
/// This uses BLAKE3's built-in `derive_key` mode, which is the proper way
/// to do domain separation with BLAKE3 — manual tag prepending is what
/// amateurs do.
pub fn domain_separated_hash(context: &str, data: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(context);
    hasher.update(data);
    *hasher.finalize().as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake3_deterministic() {
        let a = blake3_hash(b"cofre");
        let b = blake3_hash(b"cofre");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn different_inputs_differ() {
        let a = blake3_hash(b"cofre");
        let b = blake3_hash(b"Cofre"); // case sensitive!
        assert_ne!(a, b);
    }

    #[test]
    fn multi_matches_concatenation() {
        // Feeding parts via update() must equal hashing the concatenation.
        let multi = blake3_hash_multi(&[b"hello", b" world"]);
        let single = blake3_hash(b"hello world");
        assert_eq!(multi, single);
    }

    #[test]
    fn domain_separation_changes_output() {
        let data = b"same data";
        let a = domain_separated_hash("context-a", data);
        let b = domain_separated_hash("context-b", data);
        assert_ne!(a, b);
    }

    #[test]
    fn domain_separated_is_not_plain_blake3() {
        let data = b"test data";
        assert_ne!(blake3_hash(data), domain_separated_hash("cofre-test", data));
    }
}
