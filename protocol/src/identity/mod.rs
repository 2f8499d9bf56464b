//! # Identity Module
//!
//! Public addresses: the text a recipient hands out and the structured keys
//! behind it. An address carries two ed25519 public keys:
//!
//! 1. **Spend key** `B`: owning its secret is owning the funds.
//! 2. **View key** `A`: its secret lets a wallet recognise incoming outputs
//!    without being able to spend them.
//!
//! The text form is a varint network tag, both keys, an optional payment id
//! and a 4-byte Keccak checksum, rendered in Monero's block Base58 (8-byte
//! blocks map to 11 characters, so addresses have a fixed length per kind).
//!
//! ## Design Decisions
//!
//! - Keys are validated at decode time. An [`Address`] in hand always holds
//!   two decompressible points, so the derivation code never re-checks.
//! - The network is part of the decode contract. Pasting a testnet address
//!   into a mainnet genesis is an error, not a silently different chain.
//! - Base58 comes from the `base58-monero` crate; the checksum is verified
//!   here so a short or damaged input surfaces as an error, never a panic.

pub mod address;

pub use address::{Address, AddressError, ADDRESS_CHECKSUM_LEN, PAYMENT_ID_LEN};
