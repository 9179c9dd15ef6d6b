//! TOML configuration: endpoints, key material and transaction defaults

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy::primitives::U256;
use anyhow::{bail, Context};
use serde::Deserialize;

use crate::infrastructure::ethereum::GasSettings;

#[derive(Debug, Clone, Deserialize)]
pub struct BlockchainConfig {
    /// HTTP JSON-RPC endpoint, used for deployments
    #[serde(default = "default_http")]
    pub http: String,

    /// WebSocket endpoint, used by runners and the monitor
    #[serde(default = "default_ws")]
    pub ws: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub private_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    #[serde(default)]
    pub address: String,

    #[serde(default = "default_gas_limit")]
    pub gas_limit: u64,

    /// Wei
    #[serde(default = "default_gas_price")]
    pub gas_price: u64,

    /// Wei attached to write calls
    #[serde(default)]
    pub value: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub blockchain: BlockchainConfig,

    #[serde(default)]
    pub contract: ContractConfig,
}

/// Immutable transaction parameters handed to runners and the deployer.
#[derive(Clone)]
pub struct TxSettings {
    pub private_key: String,
    pub contract: String,
    pub gas: GasSettings,
}

impl std::fmt::Debug for TxSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TxSettings")
            .field("private_key", &"<redacted>")
            .field("contract", &self.contract)
            .field("gas", &self.gas)
            .finish()
    }
}

fn default_http() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_ws() -> String {
    "ws://127.0.0.1:8546".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_gas_limit() -> u64 {
    3_000_000
}

fn default_gas_price() -> u64 {
    20_000_000_000
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            http: default_http(),
            ws: default_ws(),
            timeout_secs: default_timeout_secs(),
            private_key: String::new(),
        }
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            gas_limit: default_gas_limit(),
            gas_price: default_gas_price(),
            value: 0,
        }
    }
}

impl Config {
    /// Command-line values win over the file.
    pub fn apply_overrides(&mut self, private_key: Option<String>, contract: Option<String>) {
        if let Some(key) = private_key.filter(|k| !k.trim().is_empty()) {
            self.blockchain.private_key = key;
        }
        if let Some(address) = contract.filter(|a| !a.trim().is_empty()) {
            self.contract.address = address;
        }
    }

    /// Reject settings no command can run with.
    ///
    /// The private key is checked by the write paths that need it.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.blockchain.http.trim().is_empty() || self.blockchain.ws.trim().is_empty() {
            bail!("blockchain endpoints must not be empty");
        }
        if self.blockchain.timeout_secs == 0 {
            bail!("blockchain.timeout_secs must be positive");
        }
        Ok(())
    }

    pub fn dial_timeout(&self) -> Duration {
        Duration::from_secs(self.blockchain.timeout_secs)
    }

    pub fn tx_settings(&self) -> TxSettings {
        TxSettings {
            private_key: self.blockchain.private_key.trim().to_string(),
            contract: self.contract.address.trim().to_string(),
            gas: GasSettings {
                gas_limit: self.contract.gas_limit,
                gas_price: u128::from(self.contract.gas_price),
                value: U256::from(self.contract.value),
            },
        }
    }
}

/// Load the configuration.
///
/// An explicit path must exist. A discovered path that does not exist yields
/// the defaults.
pub fn load(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match config_path() {
            Some(path) => (path, false),
            None => return Ok(Config::default()),
        },
    };
    if !required && !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(&path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str::<Config>(&content).with_context(|| format!("parsing config {}", path.display()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("WALLET_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("shared-wallet").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("shared-wallet").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "shared-wallet", "shared-wallet")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
