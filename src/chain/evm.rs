//! JSON-RPC chain client backed by alloy contract bindings.

use crate::chain::ChainClient;
use crate::config::ChainConfig;
use crate::error::{Error, Result};
use crate::types::{ContentId, TokenId, TxReceipt};
use alloy::network::{EthereumWallet, ReceiptResponse};
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;
use tracing::{debug, info, warn};

sol! {
    #[sol(rpc)]
    contract CastToken {
        function computeTokenId(string memory castId) external pure returns (uint256);
        function getCastId(uint256 tokenId) external view returns (string memory);
        function generateTokenId(string memory castId) external returns (uint256);
        function mintPrice() external view returns (uint256);
        function maxMintLimit() external view returns (uint256);
        function getTokenMintCount(uint256 tokenId) external view returns (uint256);
        function mint(address to, uint256 tokenId, uint256 quantity) external payable;
    }
}

fn rpc_error(e: impl std::fmt::Display) -> Error {
    Error::Rpc(e.to_string())
}

/// Chain client talking to the cast token contract over HTTP JSON-RPC.
///
/// Without a signer key the client is read-only: view calls work and every
/// state-changing call fails before reaching the node.
pub struct EvmChainClient {
    provider: DynProvider,
    contract: CastToken::CastTokenInstance<DynProvider>,
    confirmations: u64,
    can_sign: bool,
}

impl EvmChainClient {
    /// Connect to the contract described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the RPC URL, contract address or signer
    /// key cannot be parsed.
    pub fn new(config: &ChainConfig) -> Result<Self> {
        let url: reqwest::Url = config
            .rpc_url
            .parse()
            .map_err(|e| Error::Config(format!("Invalid RPC URL {}: {e}", config.rpc_url)))?;
        let address: Address = config.contract_address.parse().map_err(|e| {
            Error::Config(format!(
                "Invalid contract address {}: {e}",
                config.contract_address
            ))
        })?;

        let (provider, can_sign) = if let Some(key) = config.signer_key.as_deref() {
            let signer: PrivateKeySigner = key
                .parse()
                .map_err(|e| Error::Config(format!("Invalid signer key: {e}")))?;
            info!("Chain client signing as {}", signer.address());
            let provider = ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect_http(url)
                .erased();
            (provider, true)
        } else {
            warn!("No signer key configured - chain client is read-only");
            (ProviderBuilder::new().connect_http(url).erased(), false)
        };

        info!(
            "Chain client initialized (rpc={}, contract={}, confirmations={})",
            config.rpc_url, address, config.confirmations
        );

        Ok(Self {
            contract: CastToken::new(address, provider.clone()),
            provider,
            confirmations: config.confirmations,
            can_sign,
        })
    }

    /// Whether state-changing calls can be submitted.
    #[must_use]
    pub fn can_sign(&self) -> bool {
        self.can_sign
    }

    fn require_signer(&self) -> Result<()> {
        if self.can_sign {
            Ok(())
        } else {
            Err(Error::Config(
                "A signer key is required for state-changing calls".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ChainClient for EvmChainClient {
    async fn compute_token_id(&self, content_id: &ContentId) -> Result<TokenId> {
        let id = self
            .contract
            .computeTokenId(content_id.as_str().to_string())
            .call()
            .await
            .map_err(rpc_error)?;
        Ok(TokenId::new(id))
    }

    async fn get_cast_id(&self, token_id: TokenId) -> Result<String> {
        self.contract
            .getCastId(token_id.as_u256())
            .call()
            .await
            .map_err(rpc_error)
    }

    async fn generate_token_id(&self, content_id: &ContentId) -> Result<TxHash> {
        self.require_signer()?;
        let pending = self
            .contract
            .generateTokenId(content_id.as_str().to_string())
            .send()
            .await
            .map_err(rpc_error)?;
        let tx = *pending.tx_hash();
        debug!("Submitted generateTokenId for {}: {}", content_id, tx);
        Ok(tx)
    }

    async fn mint_price(&self) -> Result<U256> {
        self.contract.mintPrice().call().await.map_err(rpc_error)
    }

    async fn max_mint_limit(&self) -> Result<U256> {
        self.contract.maxMintLimit().call().await.map_err(rpc_error)
    }

    async fn token_mint_count(&self, token_id: TokenId) -> Result<U256> {
        self.contract
            .getTokenMintCount(token_id.as_u256())
            .call()
            .await
            .map_err(rpc_error)
    }

    async fn mint(
        &self,
        to: Address,
        token_id: TokenId,
        quantity: U256,
        value: U256,
    ) -> Result<TxHash> {
        self.require_signer()?;
        let pending = self
            .contract
            .mint(to, token_id.as_u256(), quantity)
            .value(value)
            .send()
            .await
            .map_err(rpc_error)?;
        let tx = *pending.tx_hash();
        debug!("Submitted mint of {} x {} to {}: {}", quantity, token_id, to, tx);
        Ok(tx)
    }

    async fn wait_for_receipt(&self, tx: TxHash) -> Result<Option<TxReceipt>> {
        let hash = PendingTransactionBuilder::new(self.provider.root().clone(), tx)
            .with_required_confirmations(self.confirmations)
            .watch()
            .await
            .map_err(|e| {
                warn!("Watching transaction {} failed: {}", tx, e);
                Error::ChainTransactionFailed
            })?;

        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| {
                warn!("Fetching receipt for {} failed: {}", hash, e);
                Error::ChainTransactionFailed
            })?;

        match receipt {
            None => {
                debug!("Transaction {} confirmed without a receipt object", hash);
                Ok(None)
            }
            Some(receipt) if !receipt.status() => {
                warn!("Transaction {} reverted", hash);
                Err(Error::ChainTransactionFailed)
            }
            Some(receipt) => Ok(Some(TxReceipt {
                transaction_hash: receipt.transaction_hash(),
                block_number: receipt.block_number(),
                gas_used: receipt.gas_used(),
            })),
        }
    }
}
