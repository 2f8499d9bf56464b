//! # Stealth One-Time Keys
//!
//! The receiver-unlinkable output scheme. The sender picks an ephemeral
//! secret `r`, publishes `R = r * G` in the transaction `extra`, and locks
//! output `i` to
//!
//! ```text
//! D = 8 * r * A                      (key derivation, A = view public key)
//! s = Hs(D || varint(i))             (derivation to scalar)
//! P = s * G + B                      (one-time output key, B = spend public key)
//! ```
//!
//! The recipient recomputes `D` as `8 * a * R` with their view secret and
//! checks whether `s * G + B` matches. Only the holder of the spend secret
//! can later produce `x = s + b` with `P = x * G`.
//!
//! For a subaddress `(C, D_sub)` the published key is `R = r * D_sub` instead
//! of `r * G`; the derivation formula is otherwise unchanged.

use crate::config::AddressKind;
use crate::crypto::hash::hash_to_scalar_multi;
use crate::crypto::keys::{KeyPair, PublicKey};
use crate::identity::Address;
use crate::varint::encode_varint;
use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use curve25519_dalek::traits::IsIdentity;
use std::fmt;
use thiserror::Error;

/// Errors from the derivation primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// The computation degenerated, e.g. a small-order public key collapsed
    /// the shared point to the identity.
    #[error("key derivation failed: {0}")]
    DerivationFailure(String),
}

// ---------------------------------------------------------------------------
// KeyDerivation
// ---------------------------------------------------------------------------

/// The shared secret point `8 * r * A`, compressed.
///
/// Both sides of the exchange can compute it; nobody else can. Treat it
/// like key material.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyDerivation([u8; 32]);

impl KeyDerivation {
    /// Raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for KeyDerivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyDerivation(..)")
    }
}

/// `8 * secret * public`.
///
/// Fails when the result is the identity, which happens only if `public`
/// lies in the small-order subgroup.
pub fn generate_key_derivation(
    public: &PublicKey,
    secret: &Scalar,
) -> Result<KeyDerivation, DerivationError> {
    let shared: EdwardsPoint = (secret * public.point()).mul_by_cofactor();
    if shared.is_identity() {
        return Err(DerivationError::DerivationFailure(
            "shared point is the identity (small-order public key)".into(),
        ));
    }
    Ok(KeyDerivation(shared.compress().to_bytes()))
}

/// `Hs(derivation || varint(output_index))`.
pub fn derivation_to_scalar(derivation: &KeyDerivation, output_index: u64) -> Scalar {
    let index = encode_varint(output_index);
    hash_to_scalar_multi(&[derivation.as_bytes(), &index])
}

/// `Hs(derivation || varint(output_index)) * G + spend_public`.
pub fn derive_public_key(
    derivation: &KeyDerivation,
    output_index: u64,
    spend_public: &PublicKey,
) -> Result<PublicKey, DerivationError> {
    let s = derivation_to_scalar(derivation, output_index);
    let point = EdwardsPoint::mul_base(&s) + spend_public.point();
    if point.is_identity() {
        return Err(DerivationError::DerivationFailure(
            "one-time key is the identity".into(),
        ));
    }
    Ok(PublicKey::from_point(point))
}

// ---------------------------------------------------------------------------
// Sender side
// ---------------------------------------------------------------------------

/// The public key published in `extra` for a payment to `destination`.
///
/// `r * G` for a standard address, `r * D_sub` for a subaddress.
pub fn tx_public_key(ephemeral: &KeyPair, destination: &Address) -> PublicKey {
    match destination.kind {
        AddressKind::Subaddress => {
            PublicKey::from_point(ephemeral.secret() * destination.spend_public_key.point())
        }
        AddressKind::Standard | AddressKind::Integrated => ephemeral.public_key(),
    }
}

/// One-time output key for output `output_index` paying `destination`.
pub fn derive_one_time_key(
    ephemeral: &KeyPair,
    destination: &Address,
    output_index: u64,
) -> Result<PublicKey, DerivationError> {
    let derivation = generate_key_derivation(&destination.view_public_key, ephemeral.secret())?;
    let key = derive_public_key(&derivation, output_index, &destination.spend_public_key)?;
    tracing::debug!(
        output_index,
        kind = %destination.kind,
        "derived one-time output key"
    );
    Ok(key)
}

// ---------------------------------------------------------------------------
// Recipient side
// ---------------------------------------------------------------------------

/// Whether `output_key` at `output_index` belongs to the wallet holding
/// `view_secret` and `spend_public`.
///
/// This is the wallet scan check, used here to prove a freshly built genesis
/// output is spendable by its intended owner.
pub fn is_output_to(
    view_secret: &Scalar,
    spend_public: &PublicKey,
    tx_public: &PublicKey,
    output_index: u64,
    output_key: &PublicKey,
) -> Result<bool, DerivationError> {
    let derivation = generate_key_derivation(tx_public, view_secret)?;
    let expected = derive_public_key(&derivation, output_index, spend_public)?;
    Ok(&expected == output_key)
}
