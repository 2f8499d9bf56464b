//! End-to-end tests for genesis construction.
//!
//! These run the full pipeline from address text to hex blob and check the
//! result byte-for-byte against recorded golden transactions, then read the
//! blob back the way a node and a wallet would.
//!
//! Golden key set: spend secret `[0x11; 32]`, view secret `[0x22; 32]`,
//! ephemeral secret `[0x42; 32]` (all reduced mod l).

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use oxyra_protocol::config::{GenesisConfig, NetworkType};
use oxyra_protocol::crypto::{is_output_to, KeyPair, PublicKey};
use oxyra_protocol::genesis::{GenesisFailure, Stage};
use oxyra_protocol::transaction::{parse_extra, ExtraField, Transaction, TxIn, TxOutTarget};
use oxyra_protocol::varint::encode_varint;
use oxyra_protocol::{build_genesis_transaction, GenesisBuilder};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const MAINNET: &str = "46gXNFZinyUY2Zk5wJNro1L8GMSDCdCiF6rCZ3JKr3VJhhUtGBoALEKTwunsDoEC8FdxVVkj52djG4LxTRSt3hNJNfNbF9a";
const STAGENET: &str = "56tZT6UgSaaY2Zk5wJNro1L8GMSDCdCiF6rCZ3JKr3VJhhUtGBoALEKTwunsDoEC8FdxVVkj52djG4LxTRSt3hNJNepxWrP";

/// 3 000 000 coins at 12 decimals.
const PREMINE: u64 = 3_000_000_000_000_000_000;

const GOLDEN_HEX: &str = "013c01ff00018080b0b1af8389d129027e5ba0a0a308694e63c9bbc65239c923b4caa4e2f56cb2dc3ebc68aa353cd29f2101007caf7a553a894389dd562115b17e78ba84a5c7692677f216c54385dc5c6ff1";
const GOLDEN_HASH: &str = "b5f1f3278b925a7822e71489f4fb16394989a91c4aedd0951425579b70ba9cc9";

/// Monero's own genesis amount, 2^44 - 1 atomic units.
const MONERO_GENESIS_AMOUNT: u64 = 17_592_186_044_415;
const MONERO_AMOUNT_HEX: &str = "013c01ff0001ffffffffffff03027e5ba0a0a308694e63c9bbc65239c923b4caa4e2f56cb2dc3ebc68aa353cd29f2101007caf7a553a894389dd562115b17e78ba84a5c7692677f216c54385dc5c6ff1";
const MONERO_AMOUNT_HASH: &str = "f97a2951f47e3c1f06a06de64c23a405ab3dac10eed1d0ce25a56cfe8ab4a6a9";

fn ephemeral() -> KeyPair {
    KeyPair::from_secret_bytes(&[0x42; 32]).expect("valid secret")
}

fn wallet() -> (KeyPair, KeyPair) {
    (
        KeyPair::from_secret_bytes(&[0x11; 32]).expect("spend"),
        KeyPair::from_secret_bytes(&[0x22; 32]).expect("view"),
    )
}

fn mainnet_builder(amount: u64) -> GenesisBuilder {
    GenesisBuilder::new(GenesisConfig::default().with_premine_atomic(amount))
}

// ---------------------------------------------------------------------------
// Golden transactions
// ---------------------------------------------------------------------------

#[test]
fn test_golden_premine_transaction() {
    let genesis = mainnet_builder(PREMINE)
        .build_with_ephemeral(MAINNET, &ephemeral())
        .expect("build");

    assert_eq!(genesis.hex, GOLDEN_HEX);
    assert_eq!(genesis.hash_hex(), GOLDEN_HASH);

    // Prefix: version 1, unlock 60, one input, gen tag, height 0.
    assert!(genesis.hex.starts_with("013c01ff00"));
    // One output carrying the premine varint, then the to-key tag.
    let mut expected_output = vec![0x01];
    expected_output.extend(encode_varint(PREMINE));
    expected_output.push(0x02);
    assert_eq!(&genesis.blob[5..5 + expected_output.len()], &expected_output[..]);
    // extra: length 33, pubkey tag, R.
    let extra_start = genesis.blob.len() - 34;
    assert_eq!(genesis.blob[extra_start], 33);
    assert_eq!(genesis.blob[extra_start + 1], 0x01);
}

#[test]
fn test_golden_monero_amount_transaction() {
    let genesis = mainnet_builder(MONERO_GENESIS_AMOUNT)
        .build_with_ephemeral(MAINNET, &ephemeral())
        .expect("build");

    assert_eq!(genesis.hex, MONERO_AMOUNT_HEX);
    assert_eq!(genesis.hash_hex(), MONERO_AMOUNT_HASH);
}

// ---------------------------------------------------------------------------
// Reading the blob back
// ---------------------------------------------------------------------------

#[test]
fn test_node_view_of_blob() {
    let hex = build_genesis_transaction(MAINNET, PREMINE).expect("build");
    let tx = Transaction::from_hex(&hex).expect("parse");

    assert_eq!(tx.version, 1);
    assert_eq!(tx.unlock_time, 60);
    assert_eq!(tx.inputs, vec![TxIn::Gen { height: 0 }]);
    assert_eq!(tx.outputs.len(), 1);
    assert_eq!(tx.outputs[0].amount, PREMINE);
    assert_eq!(tx.extra.len(), 33);
    assert!(matches!(
        parse_extra(&tx.extra).expect("extra").as_slice(),
        [ExtraField::TxPublicKey(_)]
    ));
    assert_eq!(tx.serialize().expect("reserialize"), hex::decode(&hex).unwrap());
}

#[test]
fn test_wallet_view_of_blob() {
    let (spend, view) = wallet();
    let hex = build_genesis_transaction(MAINNET, PREMINE).expect("build");
    let tx = Transaction::from_hex(&hex).expect("parse");

    let tx_pub_bytes = tx
        .tx_public_key()
        .expect("extra parses")
        .expect("R in extra");
    let tx_pub = PublicKey::from_bytes(tx_pub_bytes).expect("R valid");
    let TxOutTarget::ToKey { key } = tx.outputs[0].target;
    let output_key = PublicKey::from_bytes(key).expect("P valid");

    assert!(is_output_to(view.secret(), &spend.public_key(), &tx_pub, 0, &output_key).unwrap());

    // Someone else's view key sees nothing.
    let other_view = KeyPair::from_secret_bytes(&[0x23; 32]).unwrap();
    assert!(!is_output_to(other_view.secret(), &spend.public_key(), &tx_pub, 0, &output_key).unwrap());
}

// ---------------------------------------------------------------------------
// Determinism and freshness
// ---------------------------------------------------------------------------

#[test]
fn test_determinism_with_seeded_rng() {
    let builder = mainnet_builder(PREMINE);
    let runs: Vec<String> = (0..3)
        .map(|_| {
            builder
                .build_with_rng(MAINNET, &mut ChaCha20Rng::seed_from_u64(2024))
                .expect("build")
                .hex
        })
        .collect();
    assert!(runs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_fresh_ephemeral_key_per_run() {
    let a = build_genesis_transaction(MAINNET, PREMINE).expect("build");
    let b = build_genesis_transaction(MAINNET, PREMINE).expect("build");
    assert_ne!(a, b);
    // Only the keys differ; the structure is identical.
    assert_eq!(a.len(), b.len());
    assert_eq!(a[..24], b[..24]);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_stagenet_address_on_mainnet_fails() {
    let err = mainnet_builder(PREMINE).build(STAGENET).unwrap_err();
    assert_eq!(err.stage, Stage::AddressDecoded);
    assert!(err.to_string().contains("stagenet"));

    let stagenet = GenesisBuilder::new(
        GenesisConfig::for_network(NetworkType::Stagenet).with_premine_atomic(PREMINE),
    );
    let genesis = stagenet.build_with_ephemeral(STAGENET, &ephemeral()).expect("build");
    // Same keys, so the same bytes as on mainnet.
    assert_eq!(genesis.hex, GOLDEN_HEX);
}

#[test]
fn test_nothing_emitted_on_failure() {
    let err = build_genesis_transaction("46gXNFZiny", PREMINE).unwrap_err();
    assert_eq!(err.stage, Stage::AddressDecoded);
    assert!(matches!(err.source, GenesisFailure::Address(_)));
}
