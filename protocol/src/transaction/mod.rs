//! # Transaction Module
//!
//! The CryptoNote v1 transaction prefix: model, canonical encoding, and the
//! `extra` metadata codec. The genesis coinbase is the only transaction this
//! crate builds, so serialization refuses anything that does not look like
//! one (see [`Transaction::validate_genesis`]). Parsing is general.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    — Inputs, outputs, wire tags, TransactionError
//! model.rs    — Transaction, genesis invariants, id hash
//! encoding.rs — Canonical serializer/parser and hex helpers
//! extra.rs    — Tagged entries of the `extra` field
//! ```
//!
//! ## Design Decisions
//!
//! - The transaction id is the Keccak-256 of the blob. v1 has no signature
//!   section to exclude, so the prefix hash and the id coincide.
//! - All amounts are `u64` atomic units. No floating point near money.
//! - Non-minimal varints and trailing bytes are parse errors. A transaction
//!   has one encoding, or the id is meaningless.

pub mod encoding;
pub mod extra;
pub mod model;
pub mod types;

pub use encoding::{from_hex, to_hex};
pub use extra::{find_tx_public_key, parse_extra, serialize_extra, ExtraField};
pub use model::Transaction;
pub use types::{TransactionError, TxIn, TxOut, TxOutTarget};
