//! Command-line interface definition.

use alloy::primitives::I256;
use castmint::config::{default_config_path, ServiceConfig};
use castmint::TokenId;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Exit status for requests rejected before any I/O (bad quantity, address or id).
pub const INPUT_ERROR_EXIT_CODE: i32 = 2;

/// Resolve cast ids to token ids and mint against the cast token contract.
#[derive(Parser, Debug)]
#[command(name = "castmint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// JSON-RPC endpoint.
    #[arg(long, global = true, env = "CASTMINT_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Cast token contract address.
    #[arg(long, global = true, env = "CASTMINT_CONTRACT")]
    pub contract: Option<String>,

    /// Hex private key for state-changing calls.
    #[arg(long, global = true, env = "CASTMINT_SIGNER_KEY", hide_env_values = true)]
    pub signer_key: Option<String>,

    /// API key for the cast lookup API.
    #[arg(long, global = true, env = "CASTMINT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Shared cache server, e.g. `redis://127.0.0.1:6379/0`.
    #[arg(long, global = true, env = "CASTMINT_CACHE_URL")]
    pub cache_url: Option<String>,

    /// Disable the cache; every read goes to the chain.
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Log level.
    #[arg(long, global = true, env = "RUST_LOG")]
    pub log_level: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed by the service.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve (and generate if needed) the token id for a cast.
    TokenId {
        /// Cast hash or URL.
        content_id: String,
    },

    /// Generate a token id for a cast that has none yet.
    Generate {
        /// Cast hash or URL.
        content_id: String,
    },

    /// Look up the cast a token was generated for.
    ContentId {
        /// Decimal token id.
        token_id: TokenId,
    },

    /// Mint units of a token.
    Mint {
        /// Recipient address.
        #[arg(long)]
        to: String,

        /// Decimal token id.
        #[arg(long)]
        token_id: TokenId,

        /// Units to mint.
        #[arg(long, allow_negative_numbers = true, value_parser = parse_quantity)]
        quantity: I256,
    },

    /// Show the contract-wide mint price (wei).
    Price,

    /// Show the contract-wide per-token mint limit.
    Limit,

    /// Show how many units of a token have been minted.
    MintCount {
        /// Decimal token id.
        token_id: TokenId,
    },

    /// Write a default configuration file.
    InitConfig {
        /// Destination path.
        path: Option<PathBuf>,
    },
}

fn parse_quantity(s: &str) -> Result<I256, String> {
    I256::from_dec_str(s).map_err(|e| format!("invalid quantity {s}: {e}"))
}

impl Cli {
    /// Build the service configuration from file, then flag/env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given config file cannot be loaded.
    pub fn to_config(&self) -> color_eyre::Result<ServiceConfig> {
        let mut config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    ServiceConfig::from_file(&path)?
                } else {
                    ServiceConfig::default()
                }
            }
        };

        if let Some(rpc_url) = &self.rpc_url {
            config.chain.rpc_url.clone_from(rpc_url);
        }
        if let Some(contract) = &self.contract {
            config.chain.contract_address.clone_from(contract);
        }
        if let Some(key) = &self.signer_key {
            config.chain.signer_key = Some(key.clone());
        }
        if let Some(api_key) = &self.api_key {
            config.verifier.api_key.clone_from(api_key);
        }
        if let Some(url) = &self.cache_url {
            config.cache.url = Some(url.clone());
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
        if let Some(level) = &self.log_level {
            config.log_level.clone_from(level);
        }

        Ok(config)
    }
}
