//! Variable-length unsigned integers.
//!
//! Seven bits of magnitude per byte, least-significant group first, high bit
//! set on every byte except the last. This is the one integer encoding the
//! transaction format uses: counts, amounts, heights, address tags, and the
//! output index fed into key derivation all go through here.
//!
//! ```text
//! 127    -> 7f
//! 128    -> 80 01
//! 16383  -> ff 7f
//! 16384  -> 80 80 01
//! ```

use thiserror::Error;

/// Longest possible encoding of a u64: ceil(64 / 7).
pub const MAX_VARINT_LEN: usize = 10;

/// Errors from [`read_varint`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VarintError {
    /// Input ended while the continuation bit was still set.
    #[error("truncated varint")]
    Truncated,

    /// The value does not fit in 64 bits.
    #[error("varint overflows u64")]
    Overflow,

    /// A trailing zero group, e.g. `80 00` for 0. Two encodings of the same
    /// value would give two different blobs (and hashes) for one transaction.
    #[error("non-canonical varint encoding")]
    NonCanonical,
}

/// Append the varint encoding of `value` to `out`.
pub fn write_varint(out: &mut Vec<u8>, value: u64) {
    let mut v = value;
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        if v == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Encode `value` into a fresh buffer.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    write_varint(&mut out, value);
    out
}

/// Decode one varint from the front of `data`.
///
/// Returns the value and the number of bytes consumed.
pub fn read_varint(data: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        if i == MAX_VARINT_LEN {
            return Err(VarintError::Overflow);
        }
        let group = (byte & 0x7f) as u64;
        let shift = 7 * i as u32;
        // The tenth byte may only carry the single remaining bit.
        if shift == 63 && group > 1 {
            return Err(VarintError::Overflow);
        }
        value |= group << shift;

        if byte & 0x80 == 0 {
            if group == 0 && i > 0 {
                return Err(VarintError::NonCanonical);
            }
            return Ok((value, i + 1));
        }
    }
    Err(VarintError::Truncated)
}
