//! Configuration for paidproof.

use crate::catalog::{to_base_units, Plan};
use alloy_primitives::{address, Address, U256};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Arbitrum Sepolia chain id.
pub const ARBITRUM_SEPOLIA_CHAIN_ID: u64 = 421_614;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Wallet endpoint and target chain.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Deployed contract addresses.
    #[serde(default)]
    pub contracts: ContractsConfig,

    /// Payment parameters.
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Redemption view parameters.
    #[serde(default)]
    pub redemption: RedemptionConfig,

    /// Proof backend.
    #[serde(default)]
    pub prover: ProverConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Wallet endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint of the wallet that holds the user's key.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Chain the wallet must be connected to.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Contract addresses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// ERC-20 payment token.
    #[serde(default = "default_token")]
    pub token: Address,

    /// Subscription payment receiver.
    #[serde(default = "default_subscription")]
    pub subscription: Address,

    /// Zero-knowledge verifier router.
    #[serde(default = "default_verifier")]
    pub verifier: Address,
}

/// Payment parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    /// Allowance granted to the subscription contract, in whole tokens.
    #[serde(default = "default_allowance_tokens")]
    pub allowance_tokens: u64,

    /// Token decimals used to convert the allowance to base units.
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,

    /// Plan preselected on the payment screen.
    #[serde(default)]
    pub plan: Plan,
}

/// Redemption view parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedemptionConfig {
    /// Delay of the mock proof check in milliseconds.
    #[serde(default = "default_check_delay")]
    pub check_delay_ms: u64,
}

/// Proof backend endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProverConfig {
    /// Base URL of the proof backend, e.g. `http://127.0.0.1:3001`.
    /// Remote proving is skipped when unset.
    #[serde(default)]
    pub url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            contracts: ContractsConfig::default(),
            payment: PaymentConfig::default(),
            redemption: RedemptionConfig::default(),
            prover: ProverConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            token: default_token(),
            subscription: default_subscription(),
            verifier: default_verifier(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            allowance_tokens: default_allowance_tokens(),
            token_decimals: default_token_decimals(),
            plan: Plan::default(),
        }
    }
}

impl Default for RedemptionConfig {
    fn default() -> Self {
        Self {
            check_delay_ms: default_check_delay(),
        }
    }
}

impl NetworkConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl PaymentConfig {
    /// Fixed amount approved for every payment, in token base units.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the allowance does
    /// not fit in a `uint256` at the configured decimals.
    pub fn amount_owed(&self) -> crate::Result<U256> {
        to_base_units(self.allowance_tokens, self.token_decimals)
    }
}

impl RedemptionConfig {
    /// Mock check delay as a [`Duration`].
    #[must_use]
    pub fn check_delay(&self) -> Duration {
        Duration::from_millis(self.check_delay_ms)
    }
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

const fn default_chain_id() -> u64 {
    ARBITRUM_SEPOLIA_CHAIN_ID
}

const fn default_request_timeout() -> u64 {
    120
}

const fn default_token() -> Address {
    address!("2F4AAF1b6700A61E176daF388e75D37B857a6695")
}

const fn default_subscription() -> Address {
    address!("6fEDEb0B4942A8b438AFE68ba7c8Af4637c41903")
}

const fn default_verifier() -> Address {
    address!("0b144E07A0826182B6b59788c34b32Bfa86Fb711")
}

const fn default_allowance_tokens() -> u64 {
    10
}

const fn default_token_decimals() -> u8 {
    18
}

const fn default_check_delay() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default location of the configuration file.
#[must_use]
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "paidproof")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from(".paidproof/config.toml"))
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) describing the first
    /// invalid value.
    pub fn validate(&self) -> crate::Result<()> {
        self.payment.amount_owed()?;
        Ok(())
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &std::path::Path) -> crate::Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
