//! The transaction value and its genesis invariants.

use super::extra::{find_tx_public_key, parse_extra, ExtraField};
use super::types::{TransactionError, TxIn, TxOut};
use crate::config::{GENESIS_HEIGHT, GENESIS_TX_VERSION};
use crate::crypto::hash::keccak256;
use serde::{Deserialize, Serialize};

/// A v1 transaction prefix.
///
/// Field order here is wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Format version. Only 1 is encoded by this crate.
    pub version: u64,
    /// Block height (or timestamp) before which outputs cannot be spent.
    pub unlock_time: u64,
    /// Inputs; a coinbase has exactly one `Gen`.
    pub inputs: Vec<TxIn>,
    /// Outputs.
    pub outputs: Vec<TxOut>,
    /// Tagged metadata, see [`super::extra`].
    #[serde(with = "hex::serde")]
    pub extra: Vec<u8>,
}

impl Transaction {
    /// Check everything a genesis coinbase must satisfy.
    pub fn validate_genesis(&self) -> Result<(), TransactionError> {
        let malformed = |reason: String| Err(TransactionError::MalformedTransaction(reason));

        if self.version != GENESIS_TX_VERSION {
            return malformed(format!(
                "version {} is not {GENESIS_TX_VERSION}",
                self.version
            ));
        }
        if self.inputs.len() != 1 {
            return malformed(format!(
                "coinbase must have exactly one input, found {}",
                self.inputs.len()
            ));
        }
        match self.inputs[0] {
            TxIn::Gen { height } if height == GENESIS_HEIGHT => {}
            TxIn::Gen { height } => {
                return malformed(format!(
                    "coinbase height is {height}, expected {GENESIS_HEIGHT}"
                ))
            }
        }
        if self.outputs.len() != 1 {
            return malformed(format!(
                "genesis must have exactly one output, found {}",
                self.outputs.len()
            ));
        }
        if self.extra.is_empty() {
            return malformed("extra is empty".into());
        }
        let fields = parse_extra(&self.extra)
            .map_err(|e| TransactionError::MalformedTransaction(format!("extra: {e}")))?;
        if !fields
            .iter()
            .any(|f| matches!(f, ExtraField::TxPublicKey(_)))
        {
            return malformed("extra has no transaction public key".into());
        }
        Ok(())
    }

    /// Transaction id: Keccak-256 of the v1 blob.
    pub fn hash(&self) -> [u8; 32] {
        keccak256(&self.to_bytes())
    }

    /// The transaction public key published in `extra`.
    ///
    /// `Ok(None)` when `extra` parses but has no key entry. A malformed
    /// `extra` is an error, not an absent key.
    pub fn tx_public_key(&self) -> Result<Option<[u8; 32]>, TransactionError> {
        find_tx_public_key(&self.extra)
    }

    /// Sum of all output amounts, `None` on overflow.
    pub fn total_output(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, out| acc.checked_add(out.amount))
    }
}
