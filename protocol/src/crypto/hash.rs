//! # Keccak Hashing
//!
//! The CryptoNote family uses the original Keccak-256 (pre-NIST padding),
//! not SHA3-256. The two differ only in a padding byte and produce entirely
//! different digests, so the type name is spelled out at every call site.
//!
//! - [`keccak256`] — the "fast hash": transaction ids, address checksums.
//! - [`hash_to_scalar`] — Keccak-256 reduced modulo the ed25519 group order
//!   (`sc_reduce32`). Feeds the one-time key derivation.

use curve25519_dalek::scalar::Scalar;
use sha3::{Digest, Keccak256};

/// Keccak-256 of `data`.
///
/// # Example
///
/// ```
/// use oxyra_protocol::crypto::keccak256;
///
/// let empty = keccak256(b"");
/// assert_eq!(
///     hex::encode(empty),
///     "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
/// );
/// ```
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// Keccak-256 over several slices, fed sequentially without concatenating.
pub fn keccak256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hash to a scalar: `Keccak256(data) mod l`.
pub fn hash_to_scalar(data: &[u8]) -> Scalar {
    Scalar::from_bytes_mod_order(keccak256(data))
}

/// [`hash_to_scalar`] over several slices.
pub fn hash_to_scalar_multi(parts: &[&[u8]]) -> Scalar {
    Scalar::from_bytes_mod_order(keccak256_multi(parts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_is_not_sha3() {
        // SHA3-256("") starts with a7ffc6f8. If this ever matches, someone
        // swapped the hasher.
        let digest = keccak256(b"");
        assert_eq!(
            hex::encode(digest),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert!(!hex::encode(digest).starts_with("a7ffc6f8"));
    }

    #[test]
    fn test_keccak_known_vector() {
        assert_eq!(
            hex::encode(keccak256(b"genesis")),
            "11f1efd0825aa3c737ce7a3831438f918cc83545afbed69e69fddee7e6fd5811"
        );
    }

    #[test]
    fn test_multi_matches_concatenation() {
        let multi = keccak256_multi(&[b"gene", b"sis"]);
        assert_eq!(multi, keccak256(b"genesis"));
        assert_eq!(
            hash_to_scalar_multi(&[b"gene", b"sis"]),
            hash_to_scalar(b"genesis")
        );
    }

    #[test]
    fn test_hash_to_scalar_is_reduced() {
        // Reduction means the canonical encoding round-trips.
        let s = hash_to_scalar(b"any input at all");
        assert!(bool::from(Scalar::from_canonical_bytes(s.to_bytes()).is_some()));
    }
}
