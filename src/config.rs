//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides. Only the
//! native build reads configuration; the browser build uses
//! [`Deployment::default`].

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chain::{Address, ChainParams, ConfirmationPolicy, Deployment, NativeCurrency};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub contract: ContractConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub rpc: RpcConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Deployed registry contract
#[derive(Debug, Clone, Deserialize)]
pub struct ContractConfig {
    #[serde(default = "default_contract_address")]
    pub address: String,
}

fn default_contract_address() -> String {
    crate::chain::DEFAULT_CONTRACT_ADDRESS.to_string()
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            address: default_contract_address(),
        }
    }
}

/// Chain the registry lives on, as offered to `wallet_addEthereumChain`
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    #[serde(default = "default_chain_name")]
    pub chain_name: String,

    #[serde(default = "default_rpc_urls")]
    pub rpc_urls: Vec<String>,

    #[serde(default = "default_currency_name")]
    pub currency_name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    #[serde(default = "default_currency_decimals")]
    pub currency_decimals: u8,

    #[serde(default = "default_explorer_urls")]
    pub block_explorer_urls: Vec<String>,
}

fn default_chain_id() -> u64 {
    ChainParams::sepolia().chain_id
}

fn default_chain_name() -> String {
    ChainParams::sepolia().chain_name
}

fn default_rpc_urls() -> Vec<String> {
    ChainParams::sepolia().rpc_urls
}

fn default_currency_name() -> String {
    ChainParams::sepolia().native_currency.name
}

fn default_currency_symbol() -> String {
    ChainParams::sepolia().native_currency.symbol
}

fn default_currency_decimals() -> u8 {
    18
}

fn default_explorer_urls() -> Vec<String> {
    ChainParams::sepolia().block_explorer_urls
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            chain_name: default_chain_name(),
            rpc_urls: default_rpc_urls(),
            currency_name: default_currency_name(),
            currency_symbol: default_currency_symbol(),
            currency_decimals: default_currency_decimals(),
            block_explorer_urls: default_explorer_urls(),
        }
    }
}

/// JSON-RPC node used by the CLI
#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_max_wait")]
    pub max_wait_secs: u64,
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_max_wait() -> u64 {
    120
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            request_timeout_secs: default_request_timeout(),
            poll_interval_ms: default_poll_interval(),
            max_wait_secs: default_max_wait(),
        }
    }
}

impl RpcConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn confirmation(&self) -> ConfirmationPolicy {
        ConfirmationPolicy {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            max_wait: Duration::from_secs(self.max_wait_secs),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pet-registry").join("config.toml")),
            Some(PathBuf::from("/etc/pet-registry/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("PETREG_RPC_URL") {
            self.rpc.url = url;
        }
        if let Some(address) = var("PETREG_CONTRACT_ADDRESS") {
            self.contract.address = address;
        }
        if let Some(chain_id) = var("PETREG_CHAIN_ID") {
            match chain_id.parse() {
                Ok(id) => self.network.chain_id = id,
                Err(_) => tracing::warn!("Ignoring invalid PETREG_CHAIN_ID {:?}", chain_id),
            }
        }
        if let Some(level) = var("PETREG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("PETREG_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn contract_address(&self) -> Result<Address, ConfigError> {
        self.contract
            .address
            .parse()
            .map_err(|e: crate::chain::ChainError| ConfigError::Invalid {
                field: "contract.address",
                error: e.to_string(),
            })
    }

    pub fn chain_params(&self) -> ChainParams {
        ChainParams {
            chain_id: self.network.chain_id,
            chain_name: self.network.chain_name.clone(),
            rpc_urls: self.network.rpc_urls.clone(),
            native_currency: NativeCurrency {
                name: self.network.currency_name.clone(),
                symbol: self.network.currency_symbol.clone(),
                decimals: self.network.currency_decimals,
            },
            block_explorer_urls: self.network.block_explorer_urls.clone(),
        }
    }

    /// Where the registry lives and how long to wait for writes
    pub fn deployment(&self) -> Result<Deployment, ConfigError> {
        Ok(Deployment {
            contract_address: self.contract_address()?,
            network: self.chain_params(),
            confirmation: self.rpc.confirmation(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid {field}: {error}")]
    Invalid { field: &'static str, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pet Registry Configuration
#
# Environment variables override these settings:
# - PETREG_RPC_URL
# - PETREG_CONTRACT_ADDRESS
# - PETREG_CHAIN_ID
# - PETREG_LOG_LEVEL
# - PETREG_LOG_FORMAT

[contract]
# Address of the deployed PetRegistry contract
address = "0x1234567890123456789012345678901234567890"

[network]
# Chain the contract is deployed on (Sepolia)
chain_id = 11155111
chain_name = "Sepolia"
rpc_urls = ["https://rpc.sepolia.org"]
currency_name = "Sepolia Ether"
currency_symbol = "ETH"
currency_decimals = 18
block_explorer_urls = ["https://sepolia.etherscan.io"]

[rpc]
# JSON-RPC endpoint with an unlocked account (e.g. a local dev node)
url = "http://127.0.0.1:8545"

# Request timeout in seconds
request_timeout_secs = 30

# How often to poll for a transaction receipt (ms)
poll_interval_ms = 2000

# Give up waiting for a receipt after this many seconds
max_wait_secs = 120

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
