// Copyright (c) 2024-2026 Oxyra Project. MIT License.
// See LICENSE for details.

//! # Oxyra Protocol — Genesis Construction Library
//!
//! Everything needed to mint the network's first coinbase transaction, and
//! nothing else. The genesis blob is generated once, offline, and then baked
//! into every node forever, so this crate trades generality for exactness:
//! one input, one output, one `extra` entry, byte-for-byte CryptoNote v1.
//!
//! ## Architecture
//!
//! - **config** — Network parameters and genesis policy (premine, maturity window).
//! - **crypto** — Keccak hashing, ed25519 keypairs, stealth key derivation.
//! - **identity** — Base58 address decoding and encoding.
//! - **transaction** — Transaction model, canonical serializer, `extra` TLV codec.
//! - **genesis** — The orchestrator that composes the above into a finished blob.
//! - **updates** — The (permanently disabled) update checker.
//! - **varint** — The 7-bit variable-length integer codec shared by all of the above.
//!
//! ## Pipeline
//!
//! ```text
//! address text ─► decode ─► ephemeral keypair ─► derivation ─► assemble ─► serialize ─► hex
//! ```
//!
//! Each arrow is a fallible stage. The first failure wins and nothing is
//! emitted; see [`genesis::GenesisError`].

pub mod config;
pub mod crypto;
pub mod genesis;
pub mod identity;
pub mod transaction;
pub mod updates;
pub mod varint;

pub use genesis::{build_genesis_transaction, GenesisBuilder, GenesisError, GenesisTransaction};
