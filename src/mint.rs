//! Mint authorization: validate, check quota, price, submit, confirm.
//!
//! The limit check runs against the last observed (cached) mint count and is
//! not atomic with the mint transaction. It is a fast-fail; the contract's
//! own ceiling is the authoritative one.

use crate::chain::ChainClient;
use crate::error::{Error, Result};
use crate::event::{ServiceEvent, ServiceEventsSender};
use crate::resolver::TokenResolver;
use crate::types::{MintRequest, TokenId, TxReceipt};
use alloy::primitives::{Address, U256};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Whether minting `quantity` more would pass `limit`.
///
/// A sum that does not fit in 256 bits is necessarily over any limit.
#[must_use]
pub fn exceeds_limit(current: U256, quantity: U256, limit: U256) -> bool {
    current.checked_add(quantity).map_or(true, |total| total > limit)
}

/// Exact `price * quantity`, or `None` if no transaction could carry it.
#[must_use]
pub fn total_payment(price: U256, quantity: U256) -> Option<U256> {
    price.checked_mul(quantity)
}

/// Validates and submits mints.
pub struct MintAuthorizer {
    chain: Arc<dyn ChainClient>,
    resolver: Arc<TokenResolver>,
    events: Option<ServiceEventsSender>,
}

impl MintAuthorizer {
    /// Create an authorizer reading quota inputs through `resolver`.
    #[must_use]
    pub fn new(chain: Arc<dyn ChainClient>, resolver: Arc<TokenResolver>) -> Self {
        Self {
            chain,
            resolver,
            events: None,
        }
    }

    /// Emit [`ServiceEvent::Minted`] on this channel.
    #[must_use]
    pub fn with_events(mut self, events: ServiceEventsSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Mint `request.quantity` units of `request.token_id` to `request.recipient`.
    ///
    /// Returns the confirmed receipt, or `None` when the transaction
    /// confirmed but no receipt object was returned. `None` is a success.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidQuantity`] / [`Error::InvalidAddress`] - before any I/O
    /// * [`Error::NotInitialized`] - price or limit unavailable
    /// * [`Error::TokenNotFound`] - mint count unavailable
    /// * [`Error::MintLimitExceeded`] - quota would be exceeded
    /// * [`Error::MintFailed`] - submission or confirmation failed
    pub async fn mint(&self, request: &MintRequest) -> Result<Option<TxReceipt>> {
        // Step 1: Input shape, before any I/O
        let (recipient, quantity) = request.validate()?;
        let token_id = request.token_id;

        // Step 2: Quota inputs (cache-accelerated)
        let (price, limit, current) = futures::join!(
            self.resolver.mint_price(),
            self.resolver.max_mint_limit(),
            self.resolver.token_mint_count(token_id),
        );
        let (Ok(price), Ok(limit)) = (price, limit) else {
            return Err(Error::NotInitialized);
        };
        let current = current.map_err(|_| Error::TokenNotFound(token_id.to_string()))?;

        // Step 3: Advisory limit check
        if exceeds_limit(current, quantity, limit) {
            debug!(
                "Mint of {} x {} rejected: {} of {} already minted",
                quantity, token_id, current, limit
            );
            return Err(Error::MintLimitExceeded {
                current: current.to_string(),
                requested: quantity.to_string(),
                limit: limit.to_string(),
            });
        }

        // Step 4: Payment
        let Some(payment) = total_payment(price, quantity) else {
            error!(
                "Mint payment overflow: price {} x quantity {} for token {}",
                price, quantity, token_id
            );
            return Err(Error::MintFailed);
        };

        // Step 5: Submit and confirm
        let receipt = self.submit(recipient, token_id, quantity, payment).await?;
        info!(
            "Minted {} x token {} to {} (paid {} wei)",
            quantity, token_id, recipient, payment
        );

        if let Some(events) = &self.events {
            let _ = events.send(ServiceEvent::Minted {
                token_id,
                recipient,
                quantity,
                tx_hash: receipt.as_ref().map(|r| r.transaction_hash),
            });
        }

        Ok(receipt)
    }

    async fn submit(
        &self,
        recipient: Address,
        token_id: TokenId,
        quantity: U256,
        payment: U256,
    ) -> Result<Option<TxReceipt>> {
        let tx = self
            .chain
            .mint(recipient, token_id, quantity, payment)
            .await
            .map_err(|e| {
                error!("Mint submission for token {} failed: {}", token_id, e);
                Error::MintFailed
            })?;

        self.chain.wait_for_receipt(tx).await.map_err(|e| {
            error!("Mint transaction {} for token {} failed: {}", tx, token_id, e);
            Error::MintFailed
        })
    }
}
