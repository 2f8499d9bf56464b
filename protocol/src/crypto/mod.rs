//! # Cryptographic Primitives
//!
//! Thin, typed wrappers over `curve25519-dalek` and `sha3`. Nothing in here
//! implements curve arithmetic or a hash function; it only fixes which
//! operations the genesis pipeline performs and in what order.
//!
//! - **hash** — Keccak-256 and hash-to-scalar.
//! - **keys** — ed25519 keypairs (`public = secret * G`) and public keys.
//! - **derivation** — The stealth one-time key scheme: key derivation,
//!   derivation-to-scalar, output key, and the recipient-side check.

pub mod derivation;
pub mod hash;
pub mod keys;

pub use derivation::{
    derive_one_time_key, derive_public_key, derivation_to_scalar, generate_key_derivation,
    is_output_to, tx_public_key, DerivationError, KeyDerivation,
};
pub use hash::{hash_to_scalar, keccak256, keccak256_multi};
pub use keys::{KeyError, KeyPair, PublicKey};
