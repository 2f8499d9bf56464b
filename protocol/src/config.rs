//! # Network Parameters & Genesis Policy
//!
//! Every consensus-relevant number the genesis generator touches lives here.
//! None of it is read from globals inside the pipeline: the values are
//! bundled into a [`GenesisConfig`] and handed to the builder, so tests can
//! run the whole thing with whatever parameters they like.
//!
//! Changing any default after the genesis block is published is a hard fork.
//! Choose before launch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Consensus Constants
// ---------------------------------------------------------------------------

/// Transaction format version used for the genesis coinbase. Version 1 is
/// the pre-RingCT prefix-only format: no `rct_signatures` trailer follows.
pub const GENESIS_TX_VERSION: u64 = 1;

/// Number of blocks a coinbase output stays locked. Stored in the genesis
/// transaction's `unlock_time` field verbatim.
pub const MINED_MONEY_UNLOCK_WINDOW: u64 = 60;

/// Decimal places of the native coin. One coin = 10^12 atomic units.
pub const COIN_DECIMALS: u32 = 12;

/// Largest `coin_decimals` a 64-bit amount can carry: `u64::MAX` has 20
/// digits, so at most 19 of them can sit after the point.
pub const MAX_COIN_DECIMALS: u32 = 19;

/// The premine agreed for launch, in whole coins.
pub const DEFAULT_PREMINE_COINS: u64 = 3_000_000_000;

/// Height of the genesis block, and therefore of its coinbase input.
pub const GENESIS_HEIGHT: u64 = 0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while assembling or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `coins * 10^decimals` does not fit in the u64 amount field.
    #[error("premine of {coins} coins at {decimals} decimals overflows a 64-bit amount (max {max} atomic units)")]
    AmountOverflow {
        /// Whole coins requested.
        coins: u64,
        /// Decimal places of the coin.
        decimals: u32,
        /// `u64::MAX`, included so the message is self-explanatory.
        max: u64,
    },

    /// `coin_decimals` is larger than [`MAX_COIN_DECIMALS`].
    #[error("coin_decimals {decimals} is above the maximum of {max} for a 64-bit amount")]
    DecimalsOutOfRange {
        /// Configured decimal places.
        decimals: u32,
        /// [`MAX_COIN_DECIMALS`].
        max: u32,
    },

    /// The network name is not one of mainnet, testnet, stagenet.
    #[error("unknown network '{0}' (expected mainnet, testnet or stagenet)")]
    UnknownNetwork(String),

    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`GenesisConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// NetworkType
// ---------------------------------------------------------------------------

/// Which network an address (and the genesis block) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Production network.
    Mainnet,
    /// Public test network.
    Testnet,
    /// Staging network, tracks mainnet rules ahead of releases.
    Stagenet,
}

impl NetworkType {
    /// All networks, in a fixed order. Used when resolving an address tag.
    pub const ALL: [NetworkType; 3] = [Self::Mainnet, Self::Testnet, Self::Stagenet];

    /// Lowercase name, as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Stagenet => "stagenet",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "stagenet" | "stage" => Ok(Self::Stagenet),
            other => Err(ConfigError::UnknownNetwork(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Address tags
// ---------------------------------------------------------------------------

/// The flavour of a public address, encoded by its varint tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressKind {
    /// Primary account address: spend key + view key.
    Standard,
    /// Standard address with an 8-byte payment id appended.
    Integrated,
    /// Derived subaddress; the output public key is computed differently.
    Subaddress,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Integrated => write!(f, "integrated"),
            Self::Subaddress => write!(f, "subaddress"),
        }
    }
}

/// Varint tags that prefix an address on one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressTags {
    /// Tag for standard addresses.
    pub standard: u64,
    /// Tag for integrated addresses.
    pub integrated: u64,
    /// Tag for subaddresses.
    pub subaddress: u64,
}

impl AddressTags {
    /// Returns the tag for the given address kind.
    pub fn tag_for(&self, kind: AddressKind) -> u64 {
        match kind {
            AddressKind::Standard => self.standard,
            AddressKind::Integrated => self.integrated,
            AddressKind::Subaddress => self.subaddress,
        }
    }

    /// Returns the kind that uses `tag`, if any.
    pub fn kind_of(&self, tag: u64) -> Option<AddressKind> {
        if tag == self.standard {
            Some(AddressKind::Standard)
        } else if tag == self.integrated {
            Some(AddressKind::Integrated)
        } else if tag == self.subaddress {
            Some(AddressKind::Subaddress)
        } else {
            None
        }
    }
}

/// Address tags for every network. Inherited from the Monero codebase the
/// chain was forked from; override them in the config file if the fork
/// re-brands its address prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Mainnet tags.
    pub mainnet: AddressTags,
    /// Testnet tags.
    pub testnet: AddressTags,
    /// Stagenet tags.
    pub stagenet: AddressTags,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            mainnet: AddressTags {
                standard: 18,
                integrated: 19,
                subaddress: 42,
            },
            testnet: AddressTags {
                standard: 53,
                integrated: 54,
                subaddress: 63,
            },
            stagenet: AddressTags {
                standard: 24,
                integrated: 25,
                subaddress: 36,
            },
        }
    }
}

impl NetworkParams {
    /// Tags of one network.
    pub fn tags(&self, network: NetworkType) -> &AddressTags {
        match network {
            NetworkType::Mainnet => &self.mainnet,
            NetworkType::Testnet => &self.testnet,
            NetworkType::Stagenet => &self.stagenet,
        }
    }

    /// Resolve a tag to the network and kind that own it.
    ///
    /// Networks are searched in [`NetworkType::ALL`] order, so a tag shared
    /// by two networks (a misconfiguration) resolves to the first one.
    pub fn resolve(&self, tag: u64) -> Option<(NetworkType, AddressKind)> {
        NetworkType::ALL
            .iter()
            .find_map(|&net| self.tags(net).kind_of(tag).map(|kind| (net, kind)))
    }
}

// ---------------------------------------------------------------------------
// Premine
// ---------------------------------------------------------------------------

/// How the premine amount is specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Premine {
    /// Whole coins; multiplied by `10^coin_decimals` with overflow checking.
    Coins(u64),
    /// Atomic units, used verbatim.
    Atomic(u64),
}

/// Convert whole coins to atomic units, refusing to wrap.
///
/// ```
/// use oxyra_protocol::config::premine_from_coins;
///
/// assert_eq!(premine_from_coins(3, 12).unwrap(), 3_000_000_000_000);
/// assert!(premine_from_coins(3_000_000_000, 12).is_err());
/// ```
pub fn premine_from_coins(coins: u64, decimals: u32) -> Result<u64, ConfigError> {
    let overflow = || ConfigError::AmountOverflow {
        coins,
        decimals,
        max: u64::MAX,
    };
    let unit = 10u64.checked_pow(decimals).ok_or_else(overflow)?;
    coins.checked_mul(unit).ok_or_else(overflow)
}

/// Render an atomic amount as `whole.fraction` with exactly `decimals` digits.
///
/// Past 38 decimals the divisor no longer fits in a u128, but every u64 is
/// already below it, so the whole part is zero.
pub fn format_amount(atomic: u64, decimals: u32) -> String {
    if decimals == 0 {
        return atomic.to_string();
    }
    let value = atomic as u128;
    let (whole, fraction) = match 10u128.checked_pow(decimals) {
        Some(divisor) => (value / divisor, value % divisor),
        None => (0, value),
    };
    format!("{whole}.{fraction:0>width$}", width = decimals as usize)
}

// ---------------------------------------------------------------------------
// GenesisConfig
// ---------------------------------------------------------------------------

/// Everything the genesis builder needs to know besides the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenesisConfig {
    /// Network the destination address must belong to.
    pub network: NetworkType,
    /// Amount allocated to the destination.
    pub premine: Premine,
    /// Value of the coinbase `unlock_time` field.
    pub unlock_window: u64,
    /// Decimal places of the native coin.
    pub coin_decimals: u32,
    /// Address tag table.
    pub params: NetworkParams,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            network: NetworkType::Mainnet,
            premine: Premine::Coins(DEFAULT_PREMINE_COINS),
            unlock_window: MINED_MONEY_UNLOCK_WINDOW,
            coin_decimals: COIN_DECIMALS,
            params: NetworkParams::default(),
        }
    }
}

impl GenesisConfig {
    /// Default parameters targeting `network`.
    pub fn for_network(network: NetworkType) -> Self {
        Self {
            network,
            ..Self::default()
        }
    }

    /// Replace the premine with an exact atomic amount.
    pub fn with_premine_atomic(mut self, atomic: u64) -> Self {
        self.premine = Premine::Atomic(atomic);
        self
    }

    /// Replace the premine with a whole-coin amount.
    pub fn with_premine_coins(mut self, coins: u64) -> Self {
        self.premine = Premine::Coins(coins);
        self
    }

    /// Reject values no 64-bit amount can represent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.coin_decimals > MAX_COIN_DECIMALS {
            return Err(ConfigError::DecimalsOutOfRange {
                decimals: self.coin_decimals,
                max: MAX_COIN_DECIMALS,
            });
        }
        Ok(())
    }

    /// The premine in atomic units.
    pub fn premine_atomic(&self) -> Result<u64, ConfigError> {
        self.validate()?;
        match self.premine {
            Premine::Atomic(atomic) => Ok(atomic),
            Premine::Coins(coins) => premine_from_coins(coins, self.coin_decimals),
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded genesis config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_premine_overflows() {
        // 3e21 atomic units does not fit in 64 bits. Better to say so than
        // to mint 3e21 mod 2^64 coins into the genesis block.
        let err = GenesisConfig::default().premine_atomic().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::AmountOverflow {
                coins: DEFAULT_PREMINE_COINS,
                decimals: 12,
                ..
            }
        ));
    }

    #[test]
    fn test_premine_from_coins_fits() {
        assert_eq!(
            premine_from_coins(3_000_000, COIN_DECIMALS).unwrap(),
            3_000_000_000_000_000_000
        );
        assert_eq!(premine_from_coins(0, COIN_DECIMALS).unwrap(), 0);
    }

    #[test]
    fn test_premine_from_coins_decimal_overflow() {
        assert!(premine_from_coins(1, 20).is_err());
    }

    #[test]
    fn test_atomic_premine_is_verbatim() {
        let cfg = GenesisConfig::default().with_premine_atomic(u64::MAX);
        assert_eq!(cfg.premine_atomic().unwrap(), u64::MAX);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1_500_000_000_000, 12), "1.500000000000");
        assert_eq!(format_amount(42, 0), "42");
        assert_eq!(format_amount(5, 2), "0.05");
        assert_eq!(
            format_amount(u64::MAX, 19),
            "1.8446744073709551615"
        );
    }

    #[test]
    fn test_format_amount_beyond_u128_divisor() {
        let rendered = format_amount(1, 40);
        assert_eq!(rendered, format!("0.{}1", "0".repeat(39)));
        assert_eq!(format_amount(u64::MAX, 39).len(), 41);
    }

    #[test]
    fn test_decimals_out_of_range_rejected() {
        let mut cfg = GenesisConfig::default().with_premine_atomic(1);
        cfg.coin_decimals = MAX_COIN_DECIMALS;
        assert_eq!(cfg.premine_atomic().unwrap(), 1);

        cfg.coin_decimals = 40;
        assert!(matches!(
            cfg.premine_atomic().unwrap_err(),
            ConfigError::DecimalsOutOfRange { decimals: 40, max: 19 }
        ));
    }

    #[test]
    fn test_config_file_decimals_out_of_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "premine": {{ "atomic": 1 }}, "coin_decimals": 40 }}"#).unwrap();

        let err = GenesisConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::DecimalsOutOfRange { decimals: 40, .. }));
        assert!(err.to_string().contains("coin_decimals 40"));
    }

    #[test]
    fn test_network_from_str() {
        assert_eq!("MAINNET".parse::<NetworkType>().unwrap(), NetworkType::Mainnet);
        assert_eq!("stage".parse::<NetworkType>().unwrap(), NetworkType::Stagenet);
        assert!("regtest".parse::<NetworkType>().is_err());
    }

    #[test]
    fn test_tags_resolve_uniquely() {
        let params = NetworkParams::default();
        for net in NetworkType::ALL {
            for kind in [
                AddressKind::Standard,
                AddressKind::Integrated,
                AddressKind::Subaddress,
            ] {
                let tag = params.tags(net).tag_for(kind);
                assert_eq!(params.resolve(tag), Some((net, kind)));
            }
        }
        assert_eq!(params.resolve(0), None);
    }

    #[test]
    fn test_config_json_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "network": "testnet", "premine": {{ "atomic": 1000 }} }}"#
        )
        .unwrap();

        let cfg = GenesisConfig::from_json_file(file.path()).unwrap();
        assert_eq!(cfg.network, NetworkType::Testnet);
        assert_eq!(cfg.premine_atomic().unwrap(), 1000);
        assert_eq!(cfg.unlock_window, MINED_MONEY_UNLOCK_WINDOW);
        assert_eq!(cfg.params, NetworkParams::default());
    }

    #[test]
    fn test_config_missing_file() {
        let err = GenesisConfig::from_json_file("/nonexistent/oxyra.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
