//! Configuration module
//!
//! Handles configuration loading from TOML files with environment
//! variable support; the RPC endpoint and submission policy are explicit
//! inputs to the pipeline rather than process-wide state.

use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;

use crate::pipeline::SubmitPolicy;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint configuration
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Wallet configuration
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Submission policy configuration
    #[serde(default)]
    pub submit: SubmitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// Commitment level: processed, confirmed, or finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Path to keypair file
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitConfig {
    /// Max broadcast attempts per submission (including the first)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Base backoff delay between broadcast retries in milliseconds
    #[serde(default = "default_base_backoff")]
    pub base_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,

    /// Jitter factor (0.0 to 1.0) applied to backoff delays
    #[serde(default = "default_jitter")]
    pub jitter_factor: f64,

    /// Confirmation poll interval in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

// Default value functions
fn default_rpc_url() -> String {
    "https://api.devnet.solana.com".to_string()
}
fn default_commitment() -> String {
    "confirmed".to_string()
}
fn default_rpc_timeout() -> u64 {
    30
}
fn default_keypair_path() -> String {
    "~/.config/solana/id.json".to_string()
}
fn default_max_attempts() -> u32 {
    5
}
fn default_base_backoff() -> u64 {
    200
}
fn default_max_backoff() -> u64 {
    5_000
}
fn default_jitter() -> f64 {
    0.2
}
fn default_poll_interval() -> u64 {
    500
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            commitment: default_commitment(),
            timeout_secs: default_rpc_timeout(),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: default_keypair_path(),
        }
    }
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_backoff_ms: default_base_backoff(),
            max_backoff_ms: default_max_backoff(),
            jitter_factor: default_jitter(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            wallet: WalletConfig::default(),
            submit: SubmitConfig::default(),
        }
    }
}

impl RpcConfig {
    /// Parse the configured commitment level
    pub fn commitment_config(&self) -> anyhow::Result<CommitmentConfig> {
        match self.commitment.as_str() {
            "processed" => Ok(CommitmentConfig::processed()),
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => anyhow::bail!("Unsupported commitment level: {}", other),
        }
    }
}

impl SubmitConfig {
    /// Build the pipeline policy from this configuration
    pub fn policy(&self) -> SubmitPolicy {
        SubmitPolicy {
            max_attempts: self.max_attempts,
            base_backoff_ms: self.base_backoff_ms,
            max_backoff_ms: self.max_backoff_ms,
            jitter_factor: self.jitter_factor,
            poll_interval_ms: self.poll_interval_ms,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variables from .env
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_file(path)
    }

    /// Load from file when present, falling back to defaults
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        if std::path::Path::new(path).exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
