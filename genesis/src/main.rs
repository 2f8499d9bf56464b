// Copyright (c) 2024-2026 Oxyra Project. MIT License.
// See LICENSE for details.

//! # Oxyra Genesis Generator
//!
//! Entry point for the `gen-genesis-tx` binary. Parses arguments, resolves
//! the genesis configuration, runs the builder, and prints the blob.
//!
//! Output contract:
//!
//! - stdout: exactly one line, the hex blob (or one JSON object with `--json`)
//! - stderr: logs, a human summary, and `error: <stage>: <cause>` on failure
//! - exit status: 0 on success, 1 on any pipeline failure, 2 on bad usage

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::process::ExitCode;

use oxyra_protocol::config::{format_amount, AddressKind, NetworkType};
use oxyra_protocol::crypto::KeyPair;
use oxyra_protocol::genesis::{GenesisBuilder, GenesisError, GenesisTransaction, Stage};
use oxyra_protocol::transaction::Transaction;

use cli::GenGenesisCli;
use logging::LogFormat;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "gen_genesis_tx=info,oxyra_protocol=info";

fn main() -> ExitCode {
    let cli = GenGenesisCli::parse();
    logging::init_logging(DEFAULT_LOG_FILTER, LogFormat::from_str_lossy(&cli.log_format));

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // A pipeline error already reads "<stage>: <cause>".
            match err.downcast_ref::<GenesisError>() {
                Some(genesis_err) => eprintln!("error: {genesis_err}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Build the transaction and write it out.
fn run(cli: &GenGenesisCli) -> Result<()> {
    let config = cli
        .resolve_config()
        .map_err(|e| GenesisError::new(Stage::Start, e))?;
    let decimals = config.coin_decimals;
    tracing::info!(network = %config.network, "building genesis transaction");

    let builder = GenesisBuilder::new(config);
    let genesis = match &cli.ephemeral_secret {
        Some(secret_hex) => {
            let ephemeral = KeyPair::from_hex(secret_hex.trim())
                .map_err(|e| GenesisError::new(Stage::EphemeralKeyGenerated, e))?;
            tracing::warn!("using a caller-supplied ephemeral secret");
            builder.build_with_ephemeral(&cli.address, &ephemeral)?
        }
        None => builder.build(&cli.address)?,
    };

    print_summary(&genesis, decimals);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        let doc = JsonOutput::new(&genesis, decimals);
        serde_json::to_writer(&mut out, &doc).context("failed to encode JSON output")?;
        writeln!(out).context("failed to write to stdout")?;
    } else {
        writeln!(out, "{}", genesis.hex).context("failed to write to stdout")?;
    }
    out.flush().context("failed to flush stdout")?;
    Ok(())
}

/// Human-readable summary on stderr.
fn print_summary(genesis: &GenesisTransaction, decimals: u32) {
    eprintln!("Genesis transaction built.");
    eprintln!("  Network        : {}", genesis.destination.network);
    eprintln!("  Destination    : {} address", genesis.destination.kind);
    eprintln!(
        "  Amount         : {} atomic units ({} coins)",
        genesis.amount,
        format_amount(genesis.amount, decimals)
    );
    eprintln!("  Tx hash        : {}", genesis.hash_hex());
    eprintln!("  Tx public key  : {}", genesis.tx_public_key);
    eprintln!("  Output key     : {}", genesis.one_time_key);
    eprintln!("  Blob size      : {} bytes", genesis.blob.len());
}

/// Shape of the `--json` output.
#[derive(Serialize)]
struct JsonOutput<'a> {
    network: NetworkType,
    address_kind: AddressKind,
    amount: u64,
    amount_coins: String,
    tx_hash: String,
    tx_public_key: String,
    one_time_key: String,
    blob: &'a str,
    transaction: &'a Transaction,
}

impl<'a> JsonOutput<'a> {
    fn new(genesis: &'a GenesisTransaction, decimals: u32) -> Self {
        Self {
            network: genesis.destination.network,
            address_kind: genesis.destination.kind,
            amount: genesis.amount,
            amount_coins: format_amount(genesis.amount, decimals),
            tx_hash: genesis.hash_hex(),
            tx_public_key: genesis.tx_public_key.to_hex(),
            one_time_key: genesis.one_time_key.to_hex(),
            blob: &genesis.hex,
            transaction: &genesis.transaction,
        }
    }
}
