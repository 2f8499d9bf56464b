//! # The `extra` Field
//!
//! A free-form byte string at the end of the transaction prefix that wallets
//! parse as a sequence of tagged entries:
//!
//! ```text
//! 0x00 00 00 ..            padding: zeros up to the end of extra
//! 0x01 <32 bytes>          transaction public key R
//! 0x02 varint(n) <n bytes> nonce (payment ids live here), n <= 255
//! ```
//!
//! The genesis coinbase carries exactly one entry, the public key, so its
//! `extra` is always 33 bytes.

use super::encoding::Reader;
use super::types::TransactionError;
use crate::varint::write_varint;

/// Tag of a padding run.
pub const TX_EXTRA_TAG_PADDING: u8 = 0x00;
/// Tag of the transaction public key.
pub const TX_EXTRA_TAG_PUBKEY: u8 = 0x01;
/// Tag of a nonce.
pub const TX_EXTRA_NONCE: u8 = 0x02;
/// Largest nonce (and padding run) a wallet accepts.
pub const TX_EXTRA_NONCE_MAX_COUNT: usize = 255;

/// One parsed `extra` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraField {
    /// `n` zero bytes, tag included.
    Padding(usize),
    /// The transaction public key.
    TxPublicKey([u8; 32]),
    /// Opaque nonce bytes.
    Nonce(Vec<u8>),
}

impl ExtraField {
    /// Append the wire form of this entry.
    pub fn write(&self, out: &mut Vec<u8>) -> Result<(), TransactionError> {
        match self {
            Self::Padding(n) => {
                if *n == 0 || *n > TX_EXTRA_NONCE_MAX_COUNT {
                    return Err(TransactionError::MalformedTransaction(format!(
                        "padding of {n} bytes is out of range"
                    )));
                }
                out.resize(out.len() + n, TX_EXTRA_TAG_PADDING);
            }
            Self::TxPublicKey(key) => {
                out.push(TX_EXTRA_TAG_PUBKEY);
                out.extend_from_slice(key);
            }
            Self::Nonce(data) => {
                if data.len() > TX_EXTRA_NONCE_MAX_COUNT {
                    return Err(TransactionError::MalformedTransaction(format!(
                        "extra nonce of {} bytes exceeds {TX_EXTRA_NONCE_MAX_COUNT}",
                        data.len()
                    )));
                }
                out.push(TX_EXTRA_NONCE);
                write_varint(out, data.len() as u64);
                out.extend_from_slice(data);
            }
        }
        Ok(())
    }
}

/// Encode a list of entries into an `extra` byte string.
pub fn serialize_extra(fields: &[ExtraField]) -> Result<Vec<u8>, TransactionError> {
    let mut out = Vec::new();
    for field in fields {
        field.write(&mut out)?;
    }
    Ok(out)
}

/// Split `extra` into its entries.
///
/// Padding must be the final entry and consist only of zeros.
pub fn parse_extra(extra: &[u8]) -> Result<Vec<ExtraField>, TransactionError> {
    let mut reader = Reader::new(extra);
    let mut fields = Vec::new();

    while !reader.is_empty() {
        let tag = reader.read_u8()?;
        match tag {
            TX_EXTRA_TAG_PADDING => {
                let rest = reader.read_rest();
                let size = rest.len() + 1;
                if size > TX_EXTRA_NONCE_MAX_COUNT || rest.iter().any(|&b| b != 0) {
                    return Err(TransactionError::MalformedTransaction(
                        "extra padding is not a short run of zeros".into(),
                    ));
                }
                fields.push(ExtraField::Padding(size));
            }
            TX_EXTRA_TAG_PUBKEY => fields.push(ExtraField::TxPublicKey(reader.read_array()?)),
            TX_EXTRA_NONCE => {
                let len = reader.read_varint()?;
                if len > TX_EXTRA_NONCE_MAX_COUNT as u64 {
                    return Err(TransactionError::MalformedTransaction(format!(
                        "extra nonce length {len} exceeds {TX_EXTRA_NONCE_MAX_COUNT}"
                    )));
                }
                fields.push(ExtraField::Nonce(reader.read_bytes(len as usize)?.to_vec()));
            }
            other => {
                return Err(TransactionError::InvalidTag {
                    field: "extra",
                    tag: other,
                })
            }
        }
    }
    Ok(fields)
}

/// The first transaction public key in `extra`, if any.
pub fn find_tx_public_key(extra: &[u8]) -> Result<Option<[u8; 32]>, TransactionError> {
    Ok(parse_extra(extra)?.into_iter().find_map(|field| match field {
        ExtraField::TxPublicKey(key) => Some(key),
        _ => None,
    }))
}
