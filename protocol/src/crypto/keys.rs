//! # Key Management
//!
//! ed25519 keys in the CryptoNote convention: a secret is a bare scalar
//! (no seed expansion, no clamping) and the public key is `secret * G`,
//! compressed to 32 bytes.
//!
//! The genesis builder only ever creates one secret, the ephemeral
//! transaction key `r`. It lives for a single run, is zeroized on drop, and
//! only its public half `R = r * G` ends up in the transaction.

use curve25519_dalek::edwards::{CompressedEdwardsY, EdwardsPoint};
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;
use zeroize::Zeroize;

/// Errors that can occur during key operations.
///
/// The messages never echo key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid secret key: wrong length, bad hex, or zero scalar")]
    InvalidSecretKey,

    #[error("invalid public key: not a valid ed25519 point")]
    InvalidPublicKey,
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A compressed ed25519 point known to decompress.
///
/// Construction validates the encoding once; afterwards the decompressed
/// point is available without another fallible step.
#[derive(Clone, Copy)]
pub struct PublicKey {
    compressed: CompressedEdwardsY,
    point: EdwardsPoint,
}

impl PublicKey {
    /// Parse and validate 32 compressed bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, KeyError> {
        let compressed = CompressedEdwardsY(bytes);
        let point = compressed.decompress().ok_or(KeyError::InvalidPublicKey)?;
        Ok(Self { compressed, point })
    }

    /// Parse from a slice, which must be exactly 32 bytes.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        Self::from_bytes(bytes)
    }

    /// Wrap an already-computed point.
    pub fn from_point(point: EdwardsPoint) -> Self {
        Self {
            compressed: point.compress(),
            point,
        }
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }

    /// The 32-byte compressed encoding.
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.compressed.as_bytes()
    }

    /// Copy out the compressed encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.compressed.to_bytes()
    }

    /// The decompressed curve point.
    pub fn point(&self) -> &EdwardsPoint {
        &self.point
    }

    /// `true` for the neutral element. Valid encoding, useless as a key.
    pub fn is_identity(&self) -> bool {
        self.point.is_identity()
    }

    /// Lowercase hex of the compressed encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.compressed == other.compressed
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// A secret scalar and its public point.
///
/// Not `Serialize`: the ephemeral secret must never leave the process.
/// [`KeyPair::secret_bytes`] exists for the rare caller that needs the raw
/// scalar.
///
/// # Examples
///
/// ```
/// use oxyra_protocol::crypto::KeyPair;
///
/// let kp = KeyPair::from_secret_bytes(&[7u8; 32]).unwrap();
/// let again = KeyPair::from_secret_bytes(&[7u8; 32]).unwrap();
/// assert_eq!(kp.public_key(), again.public_key());
/// ```
pub struct KeyPair {
    secret: Scalar,
    public: PublicKey,
}

impl KeyPair {
    /// Fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut OsRng)
    }

    /// Fresh keypair from the supplied RNG.
    pub fn generate_with<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let secret = Scalar::random(rng);
            // Zero has probability 2^-252.
            if secret != Scalar::ZERO {
                return Self::from_scalar(secret);
            }
        }
    }

    /// Keypair from 32 secret bytes, reduced modulo the group order.
    ///
    /// Fails only for bytes that reduce to zero.
    pub fn from_secret_bytes(bytes: &[u8; 32]) -> Result<Self, KeyError> {
        let secret = Scalar::from_bytes_mod_order(*bytes);
        if secret == Scalar::ZERO {
            return Err(KeyError::InvalidSecretKey);
        }
        Ok(Self::from_scalar(secret))
    }

    /// Keypair from a 64-character hex secret.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Self::from_secret_bytes(&arr)
    }

    fn from_scalar(secret: Scalar) -> Self {
        let public = PublicKey::from_point(EdwardsPoint::mul_base(&secret));
        Self { secret, public }
    }

    /// The secret scalar.
    pub fn secret(&self) -> &Scalar {
        &self.secret
    }

    /// Canonical encoding of the secret scalar. Handle with care.
    pub fn secret_bytes(&self) -> [u8; 32] {
        self.secret.to_bytes()
    }

    /// The public half.
    pub fn public_key(&self) -> PublicKey {
        self.public
    }
}

impl Clone for KeyPair {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret,
            public: self.public,
        }
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public.to_hex())
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.public == other.public
    }
}

impl Eq for KeyPair {}
