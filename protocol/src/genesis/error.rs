//! Error types for the genesis pipeline.
//!
//! Every failure is tagged with the [`Stage`] that could not be completed,
//! so the CLI can say *where* things went wrong and not just *what*.

use crate::config::ConfigError;
use crate::crypto::{DerivationError, KeyError};
use crate::identity::AddressError;
use crate::transaction::TransactionError;
use std::fmt;
use thiserror::Error;

/// Pipeline states, in the only order they can occur.
///
/// Each state is reached when the step it names has succeeded. An error is
/// tagged with the state the pipeline was trying to reach, so a bad address
/// fails at [`Stage::AddressDecoded`] and a bad premine at [`Stage::Start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Configuration resolved (premine amount known).
    Start,
    /// Destination address decoded and validated.
    AddressDecoded,
    /// Ephemeral transaction keypair created.
    EphemeralKeyGenerated,
    /// One-time output key derived.
    DerivationComputed,
    /// Transaction fields assembled.
    TransactionAssembled,
    /// Canonical bytes produced.
    Serialized,
    /// Hex emitted.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "configuration",
            Self::AddressDecoded => "address decoding",
            Self::EphemeralKeyGenerated => "ephemeral key generation",
            Self::DerivationComputed => "key derivation",
            Self::TransactionAssembled => "transaction assembly",
            Self::Serialized => "serialization",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// The underlying cause of a pipeline failure.
#[derive(Debug, Error)]
pub enum GenesisFailure {
    /// Bad or overflowing configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The destination text is not a usable address.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// A supplied key could not be used.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// The stealth derivation degenerated on every attempt.
    #[error(transparent)]
    Derivation(#[from] DerivationError),

    /// The assembled transaction failed validation or encoding.
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    /// The address is valid but cannot receive the genesis output.
    #[error("unsupported destination: {0}")]
    UnsupportedDestination(String),
}

/// A failure, and the stage it happened in.
#[derive(Debug, Error)]
#[error("{stage}: {source}")]
pub struct GenesisError {
    /// The stage that did not complete.
    pub stage: Stage,
    /// What went wrong.
    #[source]
    pub source: GenesisFailure,
}

impl GenesisError {
    /// Tag `source` with `stage`.
    pub fn new(stage: Stage, source: impl Into<GenesisFailure>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }

    /// Closure for `map_err` that tags any convertible error with `stage`.
    pub(crate) fn at<E: Into<GenesisFailure>>(stage: Stage) -> impl FnOnce(E) -> Self {
        move |err| Self::new(stage, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::Start < Stage::AddressDecoded);
        assert!(Stage::TransactionAssembled < Stage::Serialized);
        assert!(Stage::Serialized < Stage::Done);
    }

    #[test]
    fn test_message_names_stage() {
        let err = GenesisError::new(Stage::AddressDecoded, AddressError::ChecksumMismatch);
        assert_eq!(err.to_string(), "address decoding: address checksum mismatch");
        assert!(std::error::Error::source(&err).is_some());
    }
}
