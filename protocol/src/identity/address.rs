//! # Address Codec
//!
//! ```text
//! varint(tag) || spend(32) || view(32) [|| payment_id(8)] || keccak256(..)[0..4]
//!     -> Monero block Base58
//!     -> 46gXNFZinyUY2Zk5wJNro1L8GMSDCdCiF6rCZ3...
//! ```
//!
//! Decoding checks, in order: Base58 validity, checksum, tag, network, body
//! length, and that both keys are points on the curve. The first failure is
//! reported.

use crate::config::{AddressKind, NetworkParams, NetworkType};
use crate::crypto::hash::keccak256;
use crate::crypto::keys::PublicKey;
use crate::varint::{read_varint, write_varint};
use thiserror::Error;

/// Trailing checksum bytes: the first four bytes of Keccak-256 over the rest.
pub const ADDRESS_CHECKSUM_LEN: usize = 4;

/// Length of the payment id carried by integrated addresses.
pub const PAYMENT_ID_LEN: usize = 8;

const KEYS_LEN: usize = 64;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from [`Address::decode`] and [`Address::to_base58`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Not Base58, wrong length, unknown tag, or a key off the curve.
    #[error("invalid address format: {0}")]
    InvalidFormat(String),

    /// The embedded checksum does not match the payload.
    #[error("address checksum mismatch")]
    ChecksumMismatch,

    /// The address is well-formed but belongs to another network.
    #[error("address is for {found}, expected {expected}")]
    UnexpectedNetwork {
        /// Network the caller is building for.
        expected: NetworkType,
        /// Network the address tag belongs to.
        found: NetworkType,
    },
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A decoded public address.
///
/// `payment_id` is `Some` exactly when `kind` is [`AddressKind::Integrated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    /// Network the address tag belongs to.
    pub network: NetworkType,
    /// Standard, integrated or subaddress.
    pub kind: AddressKind,
    /// Public spend key `B` (or `D` for a subaddress).
    pub spend_public_key: PublicKey,
    /// Public view key `A` (or `C` for a subaddress).
    pub view_public_key: PublicKey,
    /// 8-byte payment id of an integrated address.
    pub payment_id: Option<[u8; PAYMENT_ID_LEN]>,
}

impl Address {
    /// A primary account address.
    pub fn standard(network: NetworkType, spend: PublicKey, view: PublicKey) -> Self {
        Self {
            network,
            kind: AddressKind::Standard,
            spend_public_key: spend,
            view_public_key: view,
            payment_id: None,
        }
    }

    /// A subaddress with keys `(D, C)`.
    pub fn subaddress(network: NetworkType, spend: PublicKey, view: PublicKey) -> Self {
        Self {
            kind: AddressKind::Subaddress,
            ..Self::standard(network, spend, view)
        }
    }

    /// A standard address with a payment id attached.
    pub fn integrated(
        network: NetworkType,
        spend: PublicKey,
        view: PublicKey,
        payment_id: [u8; PAYMENT_ID_LEN],
    ) -> Self {
        Self {
            kind: AddressKind::Integrated,
            payment_id: Some(payment_id),
            ..Self::standard(network, spend, view)
        }
    }

    /// Decode `text`, requiring it to belong to `expected_network`.
    ///
    /// # Example
    ///
    /// ```
    /// use oxyra_protocol::config::{NetworkParams, NetworkType};
    /// use oxyra_protocol::identity::{Address, AddressError};
    ///
    /// let text = "46gXNFZinyUY2Zk5wJNro1L8GMSDCdCiF6rCZ3JKr3VJhhUtGBoALEKTwunsDoEC8FdxVVkj52djG4LxTRSt3hNJNfNbF9a";
    /// let params = NetworkParams::default();
    /// assert!(Address::decode(text, NetworkType::Mainnet, &params).is_ok());
    /// assert!(matches!(
    ///     Address::decode(text, NetworkType::Testnet, &params),
    ///     Err(AddressError::UnexpectedNetwork { .. })
    /// ));
    /// ```
    pub fn decode(
        text: &str,
        expected_network: NetworkType,
        params: &NetworkParams,
    ) -> Result<Self, AddressError> {
        let raw = base58_monero::decode(text.trim())
            .map_err(|e| AddressError::InvalidFormat(format!("not valid base58: {e:?}")))?;

        if raw.len() < 1 + KEYS_LEN + ADDRESS_CHECKSUM_LEN {
            return Err(AddressError::InvalidFormat(format!(
                "decoded length {} is too short",
                raw.len()
            )));
        }

        let (payload, checksum) = raw.split_at(raw.len() - ADDRESS_CHECKSUM_LEN);
        if keccak256(payload)[..ADDRESS_CHECKSUM_LEN] != *checksum {
            return Err(AddressError::ChecksumMismatch);
        }

        let (tag, tag_len) = read_varint(payload)
            .map_err(|e| AddressError::InvalidFormat(format!("bad address tag: {e}")))?;
        let (network, kind) = params
            .resolve(tag)
            .ok_or_else(|| AddressError::InvalidFormat(format!("unknown address tag {tag}")))?;
        if network != expected_network {
            return Err(AddressError::UnexpectedNetwork {
                expected: expected_network,
                found: network,
            });
        }

        let body = &payload[tag_len..];
        let expected_len = match kind {
            AddressKind::Integrated => KEYS_LEN + PAYMENT_ID_LEN,
            AddressKind::Standard | AddressKind::Subaddress => KEYS_LEN,
        };
        if body.len() != expected_len {
            return Err(AddressError::InvalidFormat(format!(
                "{kind} address body is {} bytes, expected {expected_len}",
                body.len()
            )));
        }

        let spend_public_key = PublicKey::try_from_slice(&body[..32])
            .map_err(|_| AddressError::InvalidFormat("spend key is not a curve point".into()))?;
        let view_public_key = PublicKey::try_from_slice(&body[32..KEYS_LEN])
            .map_err(|_| AddressError::InvalidFormat("view key is not a curve point".into()))?;
        let payment_id = match kind {
            AddressKind::Integrated => {
                let mut pid = [0u8; PAYMENT_ID_LEN];
                pid.copy_from_slice(&body[KEYS_LEN..]);
                Some(pid)
            }
            _ => None,
        };

        tracing::debug!(%network, %kind, "decoded address");
        Ok(Self {
            network,
            kind,
            spend_public_key,
            view_public_key,
            payment_id,
        })
    }

    /// Encode back to Base58 text using the tags in `params`.
    pub fn to_base58(&self, params: &NetworkParams) -> Result<String, AddressError> {
        let tag = params.tags(self.network).tag_for(self.kind);

        let mut data = Vec::with_capacity(2 + KEYS_LEN + PAYMENT_ID_LEN + ADDRESS_CHECKSUM_LEN);
        write_varint(&mut data, tag);
        data.extend_from_slice(self.spend_public_key.as_bytes());
        data.extend_from_slice(self.view_public_key.as_bytes());
        if let Some(pid) = &self.payment_id {
            data.extend_from_slice(pid);
        }
        let checksum = keccak256(&data);
        data.extend_from_slice(&checksum[..ADDRESS_CHECKSUM_LEN]);

        base58_monero::encode(&data)
            .map_err(|e| AddressError::InvalidFormat(format!("base58 encoding failed: {e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::KeyPair;

    const MAINNET: &str = "46gXNFZinyUY2Zk5wJNro1L8GMSDCdCiF6rCZ3JKr3VJhhUtGBoALEKTwunsDoEC8FdxVVkj52djG4LxTRSt3hNJNfNbF9a";
    const TESTNET: &str = "9xE4rWDz5LaY2Zk5wJNro1L8GMSDCdCiF6rCZ3JKr3VJhhUtGBoALEKTwunsDoEC8FdxVVkj52djG4LxTRSt3hNJNdMrfRB";
    const STAGENET: &str = "56tZT6UgSaaY2Zk5wJNro1L8GMSDCdCiF6rCZ3JKr3VJhhUtGBoALEKTwunsDoEC8FdxVVkj52djG4LxTRSt3hNJNepxWrP";
    const MAINNET_SUB: &str = "87WfhdDZPPtY2Zk5wJNro1L8GMSDCdCiF6rCZ3JKr3VJhhUtGBoALEKTwunsDoEC8FdxVVkj52djG4LxTRSt3hNJNdTTrzM";

    fn test_keys() -> (PublicKey, PublicKey) {
        let spend = KeyPair::from_secret_bytes(&[0x11; 32]).unwrap();
        let view = KeyPair::from_secret_bytes(&[0x22; 32]).unwrap();
        (spend.public_key(), view.public_key())
    }

    #[test]
    fn test_decode_known_addresses() {
        let params = NetworkParams::default();
        let (spend, view) = test_keys();

        for (text, net) in [
            (MAINNET, NetworkType::Mainnet),
            (TESTNET, NetworkType::Testnet),
            (STAGENET, NetworkType::Stagenet),
        ] {
            let addr = Address::decode(text, net, &params).unwrap();
            assert_eq!(addr, Address::standard(net, spend, view));
        }

        let sub = Address::decode(MAINNET_SUB, NetworkType::Mainnet, &params).unwrap();
        assert_eq!(sub.kind, AddressKind::Subaddress);
        assert_eq!(sub.spend_public_key, spend);
    }

    #[test]
    fn test_encode_known_address() {
        let params = NetworkParams::default();
        let (spend, view) = test_keys();
        let addr = Address::standard(NetworkType::Mainnet, spend, view);
        assert_eq!(addr.to_base58(&params).unwrap(), MAINNET);
        assert_eq!(MAINNET.len(), 95);
    }

    #[test]
    fn test_integrated_roundtrip() {
        let params = NetworkParams::default();
        let (spend, view) = test_keys();
        let addr = Address::integrated(NetworkType::Testnet, spend, view, *b"\x01\x02\x03\x04oxyr");
        let text = addr.to_base58(&params).unwrap();
        assert_eq!(text.len(), 106);
        let decoded = Address::decode(&text, NetworkType::Testnet, &params).unwrap();
        assert_eq!(decoded, addr);
    }

    #[test]
    fn test_corrupted_checksum_rejected() {
        let params = NetworkParams::default();
        let mut raw = base58_monero::decode(MAINNET).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0x01;
        let corrupted = base58_monero::encode(&raw).unwrap();

        assert_eq!(
            Address::decode(&corrupted, NetworkType::Mainnet, &params),
            Err(AddressError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_corrupted_key_byte_fails_checksum() {
        // Flipping a key byte must not yield a valid address with other keys.
        let params = NetworkParams::default();
        let mut raw = base58_monero::decode(MAINNET).unwrap();
        raw[10] ^= 0x80;
        let corrupted = base58_monero::encode(&raw).unwrap();

        assert_eq!(
            Address::decode(&corrupted, NetworkType::Mainnet, &params),
            Err(AddressError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_wrong_network_rejected() {
        let params = NetworkParams::default();
        assert_eq!(
            Address::decode(TESTNET, NetworkType::Mainnet, &params),
            Err(AddressError::UnexpectedNetwork {
                expected: NetworkType::Mainnet,
                found: NetworkType::Testnet,
            })
        );
    }

    #[test]
    fn test_garbage_rejected() {
        let params = NetworkParams::default();
        for text in ["", "0OIl", "hello world", "46gXNFZiny"] {
            assert!(
                matches!(
                    Address::decode(text, NetworkType::Mainnet, &params),
                    Err(AddressError::InvalidFormat(_))
                ),
                "input {text:?}"
            );
        }
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let params = NetworkParams::default();
        let (spend, view) = test_keys();
        let mut data = vec![0x07];
        data.extend_from_slice(spend.as_bytes());
        data.extend_from_slice(view.as_bytes());
        let checksum = keccak256(&data);
        data.extend_from_slice(&checksum[..4]);
        let text = base58_monero::encode(&data).unwrap();

        let err = Address::decode(&text, NetworkType::Mainnet, &params).unwrap_err();
        assert!(matches!(err, AddressError::InvalidFormat(msg) if msg.contains("unknown address tag 7")));
    }

    #[test]
    fn test_off_curve_key_rejected() {
        let params = NetworkParams::default();
        let (_, view) = test_keys();
        let mut off_curve = [0u8; 32];
        off_curve[0] = 2;

        let mut data = vec![18];
        data.extend_from_slice(&off_curve);
        data.extend_from_slice(view.as_bytes());
        let checksum = keccak256(&data);
        data.extend_from_slice(&checksum[..4]);
        let text = base58_monero::encode(&data).unwrap();

        let err = Address::decode(&text, NetworkType::Mainnet, &params).unwrap_err();
        assert!(matches!(err, AddressError::InvalidFormat(msg) if msg.contains("spend key")));
    }

    #[test]
    fn test_custom_tags() {
        let mut params = NetworkParams::default();
        params.mainnet.standard = 0x1a2b;
        let (spend, view) = test_keys();
        let addr = Address::standard(NetworkType::Mainnet, spend, view);
        let text = addr.to_base58(&params).unwrap();
        assert_eq!(Address::decode(&text, NetworkType::Mainnet, &params).unwrap(), addr);
        // Default tags no longer recognise it.
        assert!(Address::decode(&text, NetworkType::Mainnet, &NetworkParams::default()).is_err());
    }
}
