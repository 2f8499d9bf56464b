//! Canonical binary encoding of a v1 transaction prefix.
//!
//! ```text
//! varint(version) varint(unlock_time)
//! varint(#vin)  { 0xff varint(height) }
//! varint(#vout) { varint(amount) 0x02 key[32] }
//! varint(#extra) extra[..]
//! ```
//!
//! There is exactly one valid encoding per transaction: varints must be
//! minimal and nothing may follow the last field. That is what makes the
//! Keccak hash of the blob usable as the transaction id.

use super::model::Transaction;
use super::types::{TransactionError, TxIn, TxOut, TxOutTarget, TXIN_GEN_TAG, TXOUT_TO_KEY_TAG};
use crate::varint::{read_varint, write_varint};

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Forward-only cursor over a byte slice.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, TransactionError> {
        let byte = *self.data.get(self.pos).ok_or(TransactionError::Truncated)?;
        self.pos += 1;
        Ok(byte)
    }

    pub(crate) fn read_varint(&mut self) -> Result<u64, TransactionError> {
        let (value, used) = read_varint(&self.data[self.pos..])?;
        self.pos += used;
        Ok(value)
    }

    pub(crate) fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], TransactionError> {
        if self.remaining() < n {
            return Err(TransactionError::Truncated);
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N], TransactionError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub(crate) fn read_rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }

    /// Read a sequence length, rejecting counts that cannot possibly fit in
    /// what is left (each element takes at least `min_elem_size` bytes).
    fn read_len(&mut self, min_elem_size: usize) -> Result<usize, TransactionError> {
        let len = self.read_varint()?;
        let max = (self.remaining() / min_elem_size.max(1)) as u64;
        if len > max {
            return Err(TransactionError::Truncated);
        }
        Ok(len as usize)
    }
}

// ---------------------------------------------------------------------------
// Hex
// ---------------------------------------------------------------------------

/// Lowercase hex, no separators.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Inverse of [`to_hex`].
pub fn from_hex(text: &str) -> Result<Vec<u8>, TransactionError> {
    hex::decode(text.trim()).map_err(|e| TransactionError::InvalidHex(e.to_string()))
}

// ---------------------------------------------------------------------------
// Transaction codec
// ---------------------------------------------------------------------------

impl Transaction {
    /// Encode the prefix without checking genesis invariants.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(64 + self.extra.len());
        write_varint(&mut out, self.version);
        write_varint(&mut out, self.unlock_time);

        write_varint(&mut out, self.inputs.len() as u64);
        for input in &self.inputs {
            out.push(input.tag());
            match input {
                TxIn::Gen { height } => write_varint(&mut out, *height),
            }
        }

        write_varint(&mut out, self.outputs.len() as u64);
        for output in &self.outputs {
            write_varint(&mut out, output.amount);
            out.push(output.target.tag());
            match &output.target {
                TxOutTarget::ToKey { key } => out.extend_from_slice(key),
            }
        }

        write_varint(&mut out, self.extra.len() as u64);
        out.extend_from_slice(&self.extra);
        out
    }

    /// Validate the genesis invariants, then encode.
    ///
    /// The same transaction always produces the same bytes.
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        self.validate_genesis()?;
        Ok(self.to_bytes())
    }

    /// [`Transaction::serialize`], hex encoded.
    pub fn to_hex(&self) -> Result<String, TransactionError> {
        Ok(to_hex(&self.serialize()?))
    }

    /// Decode a v1 prefix. Every byte of `bytes` must be consumed.
    pub fn parse(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut r = Reader::new(bytes);
        let version = r.read_varint()?;
        let unlock_time = r.read_varint()?;

        let input_count = r.read_len(2)?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            match r.read_u8()? {
                TXIN_GEN_TAG => inputs.push(TxIn::Gen {
                    height: r.read_varint()?,
                }),
                tag => return Err(TransactionError::InvalidTag { field: "input", tag }),
            }
        }

        let output_count = r.read_len(34)?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            let amount = r.read_varint()?;
            match r.read_u8()? {
                TXOUT_TO_KEY_TAG => outputs.push(TxOut::to_key(amount, r.read_array()?)),
                tag => return Err(TransactionError::InvalidTag { field: "output", tag }),
            }
        }

        let extra_len = r.read_len(1)?;
        let extra = r.read_bytes(extra_len)?.to_vec();

        if !r.is_empty() {
            return Err(TransactionError::TrailingBytes(r.remaining()));
        }

        Ok(Self {
            version,
            unlock_time,
            inputs,
            outputs,
            extra,
        })
    }

    /// [`Transaction::parse`] from hex.
    pub fn from_hex(text: &str) -> Result<Self, TransactionError> {
        Self::parse(&from_hex(text)?)
    }
}
