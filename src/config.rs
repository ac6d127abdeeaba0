//! Configuration for castmint.

use crate::cache::MAX_CACHE_TTL;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Chain connection.
    #[serde(default)]
    pub chain: ChainConfig,

    /// Cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Content verifier configuration.
    #[serde(default)]
    pub verifier: VerifierConfig,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Chain connection configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Cast token contract address.
    #[serde(default)]
    pub contract_address: String,

    /// Confirmations to wait for on state-changing calls.
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,

    /// Hex private key used to sign transactions. Never written back to disk.
    #[serde(default, skip_serializing)]
    pub signer_key: Option<String>,
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Disable to send every read to the chain.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Shared cache server, e.g. `redis://127.0.0.1:6379/0`. Unset keeps
    /// the cache in process memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Maximum number of entries in the in-process cache.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Entry lifetime in seconds.
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

/// Content verifier configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Base URL of the cast lookup API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API key sent with every lookup.
    #[serde(default)]
    pub api_key: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_verifier_timeout")]
    pub timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: String::new(),
            confirmations: default_confirmations(),
            signer_key: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: String::new(),
            timeout_secs: default_verifier_timeout(),
        }
    }
}

impl fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainConfig")
            .field("rpc_url", &self.rpc_url)
            .field("contract_address", &self.contract_address)
            .field("confirmations", &self.confirmations)
            .field("signer_key", &self.signer_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

const fn default_confirmations() -> u64 {
    1
}

const fn default_true() -> bool {
    true
}

const fn default_cache_capacity() -> usize {
    100_000
}

const fn default_cache_ttl() -> u64 {
    60 * 60 * 24 // 24 hours
}

fn default_api_url() -> String {
    "https://api.neynar.com".to_string()
}

const fn default_verifier_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default config file location, e.g. `~/.config/castmint/config.toml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "castmint")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("castmint.toml"))
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: &std::path::Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check that the configuration can build a working service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.chain.rpc_url)
            .map_err(|e| Error::Config(format!("chain.rpc_url: {e}")))?;
        if self.chain.contract_address.is_empty() {
            return Err(Error::Config("chain.contract_address is not set".to_string()));
        }
        crate::types::parse_address(&self.chain.contract_address)
            .map_err(|_| Error::Config("chain.contract_address is not an address".to_string()))?;
        if self.chain.confirmations == 0 {
            return Err(Error::Config("chain.confirmations must be at least 1".to_string()));
        }
        if self.cache.capacity == 0 {
            return Err(Error::Config("cache.capacity must be positive".to_string()));
        }
        if self.cache.ttl_secs == 0 {
            return Err(Error::Config("cache.ttl_secs must be positive".to_string()));
        }
        if self.cache.ttl_secs > MAX_CACHE_TTL.as_secs() {
            return Err(Error::Config(format!(
                "cache.ttl_secs must be at most {}",
                MAX_CACHE_TTL.as_secs()
            )));
        }
        if let Some(url) = &self.cache.url {
            redis::Client::open(url.as_str())
                .map_err(|e| Error::Config(format!("cache.url: {e}")))?;
        }
        reqwest::Url::parse(&self.verifier.api_url)
            .map_err(|e| Error::Config(format!("verifier.api_url: {e}")))?;
        Ok(())
    }
}
