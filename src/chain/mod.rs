//! Chain client facade over the cast token contract.
//!
//! State-changing calls return a transaction hash; the operation only counts
//! as done once [`ChainClient::wait_for_receipt`] confirms it.

mod evm;

pub use evm::EvmChainClient;

use crate::error::Result;
use crate::types::{ContentId, TokenId, TxReceipt};
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use tracing::warn;

/// Typed RPC facade over the cast token contract.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Deterministic token id for a content id. Pure; no state is read or written.
    async fn compute_token_id(&self, content_id: &ContentId) -> Result<TokenId>;

    /// Content id registered for a token, empty if none.
    async fn get_cast_id(&self, token_id: TokenId) -> Result<String>;

    /// Whether the token has been generated.
    ///
    /// A failed lookup counts as absent; the contract is the final arbiter
    /// when generation is then attempted.
    async fn exists_on_chain(&self, token_id: TokenId) -> bool {
        match self.get_cast_id(token_id).await {
            Ok(cast_id) => !cast_id.is_empty(),
            Err(e) => {
                warn!("Existence check failed for token {}: {}", token_id, e);
                false
            }
        }
    }

    /// Submit the transaction registering `content_id`.
    async fn generate_token_id(&self, content_id: &ContentId) -> Result<TxHash>;

    /// Contract-wide price per unit, in wei.
    async fn mint_price(&self) -> Result<U256>;

    /// Contract-wide per-token mint ceiling.
    async fn max_mint_limit(&self) -> Result<U256>;

    /// Units minted so far for a token.
    async fn token_mint_count(&self, token_id: TokenId) -> Result<U256>;

    /// Submit a mint carrying `value` wei.
    async fn mint(
        &self,
        to: Address,
        token_id: TokenId,
        quantity: U256,
        value: U256,
    ) -> Result<TxHash>;

    /// Block until `tx` is confirmed.
    ///
    /// Returns `Ok(None)` when the transaction confirmed but the node has no
    /// receipt object for it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ChainTransactionFailed`] if the transaction
    /// reverted or could not be watched to confirmation.
    async fn wait_for_receipt(&self, tx: TxHash) -> Result<Option<TxReceipt>>;
}
