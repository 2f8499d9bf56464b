//! Core type definitions for CryptoNote v1 transactions.
//!
//! Only the variants the genesis block can contain are modelled: a coinbase
//! input and a to-key output. Anything else on the wire is an
//! [`TransactionError::InvalidTag`].

use crate::varint::VarintError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire tag of a coinbase ("gen") input.
pub const TXIN_GEN_TAG: u8 = 0xff;

/// Wire tag of a to-key output target.
pub const TXOUT_TO_KEY_TAG: u8 = 0x02;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from building, serializing and parsing transactions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// The transaction violates a genesis invariant and must not be encoded.
    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),

    /// The input ended in the middle of a field.
    #[error("truncated transaction data")]
    Truncated,

    /// A variant tag this codec does not know.
    #[error("invalid {field} tag 0x{tag:02x}")]
    InvalidTag {
        /// Which tagged field was being read.
        field: &'static str,
        /// The offending byte.
        tag: u8,
    },

    /// A varint exceeded 64 bits.
    #[error("varint overflows u64")]
    VarintOverflow,

    /// A varint carried a redundant trailing zero group.
    #[error("non-canonical varint encoding")]
    NonCanonicalVarint,

    /// Bytes were left over after a complete transaction.
    #[error("{0} trailing bytes after transaction")]
    TrailingBytes(usize),

    /// Hex input was malformed.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<VarintError> for TransactionError {
    fn from(err: VarintError) -> Self {
        match err {
            VarintError::Truncated => Self::Truncated,
            VarintError::Overflow => Self::VarintOverflow,
            VarintError::NonCanonical => Self::NonCanonicalVarint,
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// A transaction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxIn {
    /// Coinbase input: mints the block reward (here, the premine) at `height`.
    Gen {
        /// Height of the block this coinbase belongs to.
        height: u64,
    },
}

impl TxIn {
    /// Wire tag of this variant.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Gen { .. } => TXIN_GEN_TAG,
        }
    }
}

/// Where an output's value is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxOutTarget {
    /// Locked to a one-time public key.
    ToKey {
        /// Compressed one-time output key `P`.
        #[serde(with = "hex_key")]
        key: [u8; 32],
    },
}

impl TxOutTarget {
    /// Wire tag of this variant.
    pub fn tag(&self) -> u8 {
        match self {
            Self::ToKey { .. } => TXOUT_TO_KEY_TAG,
        }
    }
}

/// A transaction output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxOut {
    /// Atomic units carried by this output.
    pub amount: u64,
    /// Lock target.
    pub target: TxOutTarget,
}

impl TxOut {
    /// An output of `amount` locked to `key`.
    pub fn to_key(amount: u64, key: [u8; 32]) -> Self {
        Self {
            amount,
            target: TxOutTarget::ToKey { key },
        }
    }
}

/// Keys in JSON as lowercase hex rather than arrays of 32 numbers.
mod hex_key {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&hex::encode(key))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(d)?;
        let bytes = hex::decode(&text).map_err(serde::de::Error::custom)?;
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("expected 32 bytes"))
    }
}
