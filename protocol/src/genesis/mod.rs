//! # Genesis Transaction Builder
//!
//! Composes the address codec, the stealth derivation and the transaction
//! encoder into the finished genesis coinbase.
//!
//! ## Pipeline
//!
//! ```text
//! Start → AddressDecoded → EphemeralKeyGenerated → DerivationComputed
//!       → TransactionAssembled → Serialized → Done
//! ```
//!
//! Strictly linear and fail-fast: the first error ends the run and is
//! returned as a [`GenesisError`] naming the stage. There is no partial
//! output.
//!
//! ## Fixed Policy
//!
//! - Version 1, `unlock_time` from the configured unlock window (60).
//! - One coinbase input at height 0.
//! - One output of the full premine, locked to the one-time key for output
//!   index 0. Never to the raw spend key: that would be visible to everyone
//!   and invisible to the owner's wallet scan.
//! - `extra` holds the transaction public key and nothing else.

pub mod builder;
pub mod error;

pub use builder::{build_genesis_transaction, GenesisBuilder, GenesisTransaction, MAX_EPHEMERAL_ATTEMPTS};
pub use error::{GenesisError, GenesisFailure, Stage};
