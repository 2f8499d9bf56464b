//! Genesis construction via the builder pattern.
//!
//! [`GenesisBuilder`] holds the configuration; each `build*` call runs the
//! whole pipeline for one destination and returns a finished
//! [`GenesisTransaction`] or the first error. Nothing is printed here. The
//! caller decides what to do with the result.

use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};

use super::error::{GenesisError, GenesisFailure, Stage};
use crate::config::{format_amount, AddressKind, GenesisConfig, GENESIS_HEIGHT, GENESIS_TX_VERSION};
use crate::crypto::{derive_one_time_key, tx_public_key, KeyPair, PublicKey};
use crate::identity::Address;
use crate::transaction::{serialize_extra, to_hex, ExtraField, Transaction, TxIn, TxOut};

/// How many fresh ephemeral keys to try before giving up on derivation.
pub const MAX_EPHEMERAL_ATTEMPTS: usize = 3;

// ---------------------------------------------------------------------------
// GenesisTransaction
// ---------------------------------------------------------------------------

/// The output of a successful run.
#[derive(Debug, Clone)]
pub struct GenesisTransaction {
    /// The assembled transaction.
    pub transaction: Transaction,
    /// Canonical encoding of `transaction`.
    pub blob: Vec<u8>,
    /// `blob` as lowercase hex. This is what goes into the node's source.
    pub hex: String,
    /// Transaction id.
    pub hash: [u8; 32],
    /// `R`, as published in `extra`.
    pub tx_public_key: PublicKey,
    /// `P`, the key the premine is locked to.
    pub one_time_key: PublicKey,
    /// Who receives the premine.
    pub destination: Address,
    /// Premine in atomic units.
    pub amount: u64,
}

impl GenesisTransaction {
    /// Transaction id as lowercase hex.
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

// ---------------------------------------------------------------------------
// GenesisBuilder
// ---------------------------------------------------------------------------

/// Builds the genesis coinbase for a fixed configuration.
///
/// # Examples
///
/// ```
/// use oxyra_protocol::config::GenesisConfig;
/// use oxyra_protocol::crypto::KeyPair;
/// use oxyra_protocol::GenesisBuilder;
///
/// let config = GenesisConfig::default().with_premine_atomic(1_000_000_000_000);
/// let ephemeral = KeyPair::from_secret_bytes(&[0x42; 32]).unwrap();
/// let genesis = GenesisBuilder::new(config)
///     .build_with_ephemeral(
///         "46gXNFZinyUY2Zk5wJNro1L8GMSDCdCiF6rCZ3JKr3VJhhUtGBoALEKTwunsDoEC8FdxVVkj52djG4LxTRSt3hNJNfNbF9a",
///         &ephemeral,
///     )
///     .unwrap();
/// assert!(genesis.hex.starts_with("013c01ff00"));
/// ```
#[derive(Debug, Clone)]
pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    /// A builder for `config`.
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &GenesisConfig {
        &self.config
    }

    /// Build with a fresh ephemeral key from the OS RNG.
    pub fn build(&self, destination: &str) -> Result<GenesisTransaction, GenesisError> {
        self.build_with_rng(destination, &mut OsRng)
    }

    /// Build, drawing ephemeral keys from `rng`.
    ///
    /// A derivation failure discards the key and draws another, up to
    /// [`MAX_EPHEMERAL_ATTEMPTS`] keys in total.
    pub fn build_with_rng<R: RngCore + CryptoRng>(
        &self,
        destination: &str,
        rng: &mut R,
    ) -> Result<GenesisTransaction, GenesisError> {
        let (amount, address) = self.prepare(destination)?;

        let mut attempt = 1;
        loop {
            let ephemeral = KeyPair::generate_with(rng);
            tracing::debug!(stage = %Stage::EphemeralKeyGenerated, attempt, "generated ephemeral key");

            match derive_one_time_key(&ephemeral, &address, 0) {
                Ok(one_time_key) => return self.finish(address, amount, &ephemeral, one_time_key),
                Err(err) if attempt < MAX_EPHEMERAL_ATTEMPTS => {
                    tracing::warn!(attempt, error = %err, "derivation failed, regenerating ephemeral key");
                    attempt += 1;
                }
                Err(err) => return Err(GenesisError::new(Stage::DerivationComputed, err)),
            }
        }
    }

    /// Build with a caller-supplied ephemeral key. Same key, same
    /// destination, same configuration: same bytes.
    pub fn build_with_ephemeral(
        &self,
        destination: &str,
        ephemeral: &KeyPair,
    ) -> Result<GenesisTransaction, GenesisError> {
        let (amount, address) = self.prepare(destination)?;
        tracing::debug!(stage = %Stage::EphemeralKeyGenerated, "using supplied ephemeral key");
        let one_time_key = derive_one_time_key(ephemeral, &address, 0)
            .map_err(GenesisError::at(Stage::DerivationComputed))?;
        self.finish(address, amount, ephemeral, one_time_key)
    }

    /// Resolve the amount and decode the destination.
    fn prepare(&self, destination: &str) -> Result<(u64, Address), GenesisError> {
        let amount = self
            .config
            .premine_atomic()
            .map_err(GenesisError::at(Stage::Start))?;
        tracing::debug!(
            stage = %Stage::Start,
            network = %self.config.network,
            amount,
            "resolved premine"
        );

        let address = Address::decode(destination, self.config.network, &self.config.params)
            .map_err(GenesisError::at(Stage::AddressDecoded))?;
        if address.kind == AddressKind::Integrated {
            return Err(GenesisError::new(
                Stage::AddressDecoded,
                GenesisFailure::UnsupportedDestination(
                    "integrated addresses need a payment id in extra; use the standard address"
                        .into(),
                ),
            ));
        }
        tracing::debug!(stage = %Stage::AddressDecoded, kind = %address.kind, "destination accepted");

        Ok((amount, address))
    }

    /// Assemble, serialize and package.
    fn finish(
        &self,
        destination: Address,
        amount: u64,
        ephemeral: &KeyPair,
        one_time_key: PublicKey,
    ) -> Result<GenesisTransaction, GenesisError> {
        tracing::debug!(stage = %Stage::DerivationComputed, "one-time key ready");

        let tx_public_key = tx_public_key(ephemeral, &destination);
        let extra = serialize_extra(&[ExtraField::TxPublicKey(tx_public_key.to_bytes())])
            .map_err(GenesisError::at(Stage::TransactionAssembled))?;
        let transaction = Transaction {
            version: GENESIS_TX_VERSION,
            unlock_time: self.config.unlock_window,
            inputs: vec![TxIn::Gen {
                height: GENESIS_HEIGHT,
            }],
            outputs: vec![TxOut::to_key(amount, one_time_key.to_bytes())],
            extra,
        };
        tracing::debug!(stage = %Stage::TransactionAssembled, "transaction assembled");

        let blob = transaction
            .serialize()
            .map_err(GenesisError::at(Stage::Serialized))?;
        let hash = transaction.hash();
        tracing::debug!(stage = %Stage::Serialized, bytes = blob.len(), "transaction serialized");

        let genesis = GenesisTransaction {
            hex: to_hex(&blob),
            blob,
            hash,
            transaction,
            tx_public_key,
            one_time_key,
            destination,
            amount,
        };
        tracing::info!(
            stage = %Stage::Done,
            tx_hash = %genesis.hash_hex(),
            amount = %format_amount(amount, self.config.coin_decimals),
            "genesis transaction built"
        );
        Ok(genesis)
    }
}

/// Build the genesis hex for `destination` on mainnet with `premine_amount`
/// atomic units and a fresh ephemeral key.
pub fn build_genesis_transaction(
    destination: &str,
    premine_amount: u64,
) -> Result<String, GenesisError> {
    let config = GenesisConfig::default().with_premine_atomic(premine_amount);
    GenesisBuilder::new(config)
        .build(destination)
        .map(|genesis| genesis.hex)
}
