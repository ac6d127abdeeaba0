//! Token resolution: content id ⇄ token id, with idempotent generation.
//!
//! ```text
//! resolve_or_create(content_id)
//!        │
//!        ▼
//! ┌─────────────────────┐
//! │ tokenId:<content>   │── HIT ──► return (no chain call)
//! └─────────┬───────────┘
//!          MISS
//!           ▼
//!   compute_token_id (pure)
//!           │
//!    ┌──────┴──────┐
//!    │             │
//! EXISTS        ABSENT
//!    │             │
//!    │       verify content ── fail ──► InvalidContentId
//!    │             │
//!    │       generate + wait ── fail ──► ChainTransactionFailed
//!    │             │
//!    └──────┬──────┘
//!           ▼
//!   cache (24h) + return
//! ```
//!
//! Two concurrent first-time calls for the same content id can both reach
//! the generation branch. Uniqueness is enforced by the contract; nothing
//! here serializes callers.

use crate::cache::{CacheKey, CacheStore, DEFAULT_CACHE_TTL};
use crate::chain::ChainClient;
use crate::error::{Error, Result};
use crate::event::{ServiceEvent, ServiceEventsSender};
use crate::types::{ContentId, TokenId};
use crate::verifier::ContentVerifier;
use alloy::primitives::U256;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Resolves content ids to token ids and back, fronting the chain with a cache.
pub struct TokenResolver {
    chain: Arc<dyn ChainClient>,
    cache: Arc<dyn CacheStore>,
    verifier: Arc<dyn ContentVerifier>,
    ttl: Duration,
    events: Option<ServiceEventsSender>,
}

impl TokenResolver {
    /// Create a resolver with the default 24 hour TTL.
    #[must_use]
    pub fn new(
        chain: Arc<dyn ChainClient>,
        cache: Arc<dyn CacheStore>,
        verifier: Arc<dyn ContentVerifier>,
    ) -> Self {
        Self {
            chain,
            cache,
            verifier,
            ttl: DEFAULT_CACHE_TTL,
            events: None,
        }
    }

    /// Override the TTL applied to every cache write.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Emit [`ServiceEvent::TokenGenerated`] on this channel.
    #[must_use]
    pub fn with_events(mut self, events: ServiceEventsSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Resolve the token id for `content_id`, generating it on-chain if needed.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidContentId`] - the token is absent and the content
    ///   could not be verified
    /// * [`Error::ChainTransactionFailed`] - generation did not confirm
    /// * [`Error::ChainUnavailable`] - the token id could not be computed
    pub async fn resolve_or_create(&self, content_id: &ContentId) -> Result<TokenId> {
        let key = CacheKey::TokenId(content_id.clone());

        // Step 1: Check cache (fast path)
        if let Some(token_id) = self.cached_token_id(&key).await {
            debug!("Token id for {} found in cache", content_id);
            return Ok(token_id);
        }

        // Step 2: Deterministic id from the contract
        let token_id = self.compute_token_id(content_id).await?;

        // Step 3: Generate only if the chain does not know it yet
        if self.chain.exists_on_chain(token_id).await {
            debug!("Token {} for {} already exists on chain", token_id, content_id);
        } else {
            self.verify_content(content_id).await?;
            self.submit_generation(content_id).await?;
            info!("New token id generated: {} for {}", token_id, content_id);
            self.emit_generated(content_id, token_id);
        }

        self.cache_set(&key, token_id.to_string()).await;
        Ok(token_id)
    }

    /// Generate a token id for content the caller believes is new.
    ///
    /// The cache check is a best-effort, single-process duplicate guard; it
    /// does not consult the chain before submitting.
    ///
    /// # Errors
    ///
    /// * [`Error::AlreadyExists`] - a token id for `content_id` is cached
    /// * [`Error::InvalidContentId`] - the content could not be verified
    /// * [`Error::ChainTransactionFailed`] - generation did not confirm
    /// * [`Error::ChainUnavailable`] - the token id could not be computed
    pub async fn generate_explicit(&self, content_id: &ContentId) -> Result<TokenId> {
        let key = CacheKey::TokenId(content_id.clone());
        if self.cache_get(&key).await.is_some() {
            return Err(Error::AlreadyExists(content_id.to_string()));
        }

        self.verify_content(content_id).await?;
        self.submit_generation(content_id).await?;

        let token_id = self.compute_token_id(content_id).await?;
        info!("New token id generated: {} for {}", token_id, content_id);
        self.emit_generated(content_id, token_id);

        self.cache_set(&key, token_id.to_string()).await;
        Ok(token_id)
    }

    /// Inverse lookup: the content id a token was generated for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the token has no content id or the
    /// chain lookup fails; the two are not distinguished.
    pub async fn resolve_content_id(&self, token_id: TokenId) -> Result<ContentId> {
        let key = CacheKey::ContentId(token_id);

        if let Some(content_id) = self.cache_get(&key).await {
            debug!("Content id for token {} found in cache", token_id);
            return Ok(ContentId::new(content_id));
        }

        match self.chain.get_cast_id(token_id).await {
            Ok(content_id) if !content_id.is_empty() => {
                self.cache_set(&key, content_id.clone()).await;
                Ok(ContentId::new(content_id))
            }
            Ok(_) => {
                debug!("Token {} has no content id on chain", token_id);
                Err(Error::NotFound(token_id.to_string()))
            }
            Err(e) => {
                warn!("Content id lookup for token {} failed: {}", token_id, e);
                Err(Error::NotFound(token_id.to_string()))
            }
        }
    }

    /// Contract-wide mint price in wei (cached).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChainUnavailable`] if the price cannot be read.
    pub async fn mint_price(&self) -> Result<U256> {
        self.cached_read(CacheKey::MintPrice, self.chain.mint_price())
            .await
    }

    /// Contract-wide per-token mint limit (cached).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChainUnavailable`] if the limit cannot be read.
    pub async fn max_mint_limit(&self) -> Result<U256> {
        self.cached_read(CacheKey::MaxMintLimit, self.chain.max_mint_limit())
            .await
    }

    /// Units minted so far for `token_id` (cached, so possibly stale).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChainUnavailable`] if the count cannot be read.
    pub async fn token_mint_count(&self, token_id: TokenId) -> Result<U256> {
        self.cached_read(
            CacheKey::TokenMintCount(token_id),
            self.chain.token_mint_count(token_id),
        )
        .await
    }

    async fn cached_read<F>(&self, key: CacheKey, read: F) -> Result<U256>
    where
        F: std::future::Future<Output = Result<U256>>,
    {
        if let Some(cached) = self.cache_get(&key).await {
            match U256::from_str_radix(&cached, 10) {
                Ok(value) => return Ok(value),
                Err(_) => debug!("Ignoring malformed cache value for {}", key),
            }
        }

        let value = read.await.map_err(|e| {
            warn!("Chain read for {} failed: {}", key, e);
            Error::ChainUnavailable
        })?;
        self.cache_set(&key, value.to_string()).await;
        Ok(value)
    }

    async fn cached_token_id(&self, key: &CacheKey) -> Option<TokenId> {
        let cached = self.cache_get(key).await?;
        match cached.parse() {
            Ok(token_id) => Some(token_id),
            Err(_) => {
                debug!("Ignoring malformed cache value for {}", key);
                None
            }
        }
    }

    async fn compute_token_id(&self, content_id: &ContentId) -> Result<TokenId> {
        self.chain.compute_token_id(content_id).await.map_err(|e| {
            warn!("computeTokenId for {} failed: {}", content_id, e);
            Error::ChainUnavailable
        })
    }

    async fn verify_content(&self, content_id: &ContentId) -> Result<()> {
        self.verifier.verify(content_id).await.map_err(|e| {
            warn!("Content {} failed verification: {}", content_id, e);
            Error::InvalidContentId(content_id.to_string())
        })
    }

    /// Submit `generateTokenId` and block until it confirms.
    async fn submit_generation(&self, content_id: &ContentId) -> Result<()> {
        let tx = self
            .chain
            .generate_token_id(content_id)
            .await
            .map_err(|e| match e {
                Error::Config(_) => e,
                e => {
                    warn!("generateTokenId for {} failed: {}", content_id, e);
                    Error::ChainTransactionFailed
                }
            })?;

        self.chain.wait_for_receipt(tx).await.map_err(|e| {
            warn!("Generation transaction {} for {} failed: {}", tx, content_id, e);
            Error::ChainTransactionFailed
        })?;
        Ok(())
    }

    fn emit_generated(&self, content_id: &ContentId, token_id: TokenId) {
        if let Some(events) = &self.events {
            let _ = events.send(ServiceEvent::TokenGenerated {
                content_id: content_id.clone(),
                token_id,
            });
        }
    }

    /// Cache read that treats store failure as a miss.
    async fn cache_get(&self, key: &CacheKey) -> Option<String> {
        let key = key.to_string();
        match self.cache.get(&key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache read for {} failed, falling back to chain: {}", key, e);
                None
            }
        }
    }

    /// Cache write that swallows store failure.
    async fn cache_set(&self, key: &CacheKey, value: String) {
        let key = key.to_string();
        if let Err(e) = self.cache.set(&key, value, self.ttl).await {
            warn!("Cache write for {} failed: {}", key, e);
        }
    }
}
