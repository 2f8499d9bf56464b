//! # CLI Interface
//!
//! `gen-genesis-tx <ADDRESS> [options]`, defined with `clap` derive. Every
//! option can also come from an `OXYRA_*` environment variable.

use clap::Parser;
use oxyra_protocol::config::{ConfigError, GenesisConfig, NetworkType};
use std::path::PathBuf;

/// Generate the Oxyra genesis coinbase transaction.
///
/// Prints the transaction blob as a single hex line on stdout. A summary
/// and any diagnostics go to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "gen-genesis-tx",
    about = "Generate the Oxyra genesis coinbase transaction",
    version,
    after_help = "A premine amount is required: pass --premine-coins or --premine-atomic, \
                  or set `premine` in the --config file. The built-in default of 3000000000 \
                  coins does not fit in a 64-bit amount and is rejected."
)]
pub struct GenGenesisCli {
    /// Address that receives the premine.
    pub address: String,

    /// Network the address must belong to: mainnet, testnet or stagenet.
    ///
    /// Overrides the config file.
    #[arg(long, short = 'n', env = "OXYRA_NETWORK")]
    pub network: Option<NetworkType>,

    /// JSON file with genesis parameters. Missing fields take defaults.
    #[arg(long, short = 'c', env = "OXYRA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Premine in whole coins, scaled by the coin's decimals.
    #[arg(long, env = "OXYRA_PREMINE_COINS", conflicts_with = "premine_atomic")]
    pub premine_coins: Option<u64>,

    /// Premine in atomic units, used verbatim.
    #[arg(long, env = "OXYRA_PREMINE_ATOMIC")]
    pub premine_atomic: Option<u64>,

    /// Blocks the premine stays locked (the coinbase `unlock_time`).
    #[arg(long, env = "OXYRA_UNLOCK_WINDOW")]
    pub unlock_window: Option<u64>,

    /// Hex ephemeral secret, to rebuild a previously published blob.
    ///
    /// **Never reuse this for a second transaction.** Omit it and a fresh
    /// key is drawn from the OS.
    #[arg(long, env = "OXYRA_EPHEMERAL_SECRET", hide_env_values = true)]
    pub ephemeral_secret: Option<String>,

    /// Print one JSON object instead of the bare hex blob.
    #[arg(long)]
    pub json: bool,

    /// Log format: pretty or json.
    #[arg(long, env = "OXYRA_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

impl GenGenesisCli {
    /// Config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<GenesisConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => GenesisConfig::from_json_file(path)?,
            None => GenesisConfig::default(),
        };
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(coins) = self.premine_coins {
            config = config.with_premine_coins(coins);
        }
        if let Some(atomic) = self.premine_atomic {
            config = config.with_premine_atomic(atomic);
        }
        if let Some(window) = self.unlock_window {
            config.unlock_window = window;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        GenGenesisCli::command().debug_assert();
    }

    #[test]
    fn test_overrides_apply() {
        let cli = GenGenesisCli::parse_from([
            "gen-genesis-tx",
            "addr",
            "--network",
            "testnet",
            "--premine-coins",
            "5",
            "--unlock-window",
            "10",
        ]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.network, NetworkType::Testnet);
        assert_eq!(config.premine_atomic().unwrap(), 5_000_000_000_000);
        assert_eq!(config.unlock_window, 10);
    }

    #[test]
    fn test_premine_flags_conflict() {
        let parsed = GenGenesisCli::try_parse_from([
            "gen-genesis-tx",
            "addr",
            "--premine-coins",
            "1",
            "--premine-atomic",
            "1",
        ]);
        assert!(parsed.is_err());
    }
}
