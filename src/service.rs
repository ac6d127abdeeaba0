//! Service composition - built once at startup, shared by reference.

use crate::cache::{CacheStats, CacheStore, NullCache, RedisCache, TtlCache};
use crate::chain::{ChainClient, EvmChainClient};
use crate::config::ServiceConfig;
use crate::error::Result;
use crate::event::{create_event_channel, ServiceEventsChannel, ServiceEventsSender};
use crate::mint::MintAuthorizer;
use crate::resolver::TokenResolver;
use crate::types::{ContentId, MintRequest, TokenId, TxReceipt};
use crate::verifier::{ContentVerifier, HubVerifier};
use alloy::primitives::U256;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Builder for constructing a [`MintService`].
///
/// Components not supplied explicitly are built from the configuration.
pub struct ServiceBuilder {
    config: ServiceConfig,
    chain: Option<Arc<dyn ChainClient>>,
    cache: Option<Arc<dyn CacheStore>>,
    verifier: Option<Arc<dyn ContentVerifier>>,
}

impl ServiceBuilder {
    /// Create a new service builder with the given configuration.
    #[must_use]
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            chain: None,
            cache: None,
            verifier: None,
        }
    }

    /// Use this chain client instead of connecting from config.
    #[must_use]
    pub fn with_chain(mut self, chain: Arc<dyn ChainClient>) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Use this cache store instead of the configured one.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use this content verifier instead of the configured one.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn ContentVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Build the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a component
    /// fails to initialize.
    pub fn build(self) -> Result<MintService> {
        let config = self.config;

        let chain: Arc<dyn ChainClient> = match self.chain {
            Some(chain) => chain,
            None => {
                config.validate()?;
                Arc::new(EvmChainClient::new(&config.chain)?)
            }
        };

        let verifier: Arc<dyn ContentVerifier> = match self.verifier {
            Some(verifier) => verifier,
            None => Arc::new(HubVerifier::new(&config.verifier)?),
        };

        let mut local_cache = None;
        let cache: Arc<dyn CacheStore> = match (self.cache, &config.cache.url) {
            (Some(cache), _) => cache,
            (None, _) if !config.cache.enabled => Arc::new(NullCache),
            (None, Some(url)) => Arc::new(RedisCache::new(url)?),
            (None, None) => {
                let cache = TtlCache::with_capacity(config.cache.capacity);
                local_cache = Some(cache.clone());
                Arc::new(cache)
            }
        };

        let (events_tx, _) = create_event_channel();
        let ttl = Duration::from_secs(config.cache.ttl_secs);

        let resolver = Arc::new(
            TokenResolver::new(Arc::clone(&chain), cache, verifier)
                .with_ttl(ttl)
                .with_events(events_tx.clone()),
        );
        let authorizer =
            MintAuthorizer::new(chain, Arc::clone(&resolver)).with_events(events_tx.clone());

        info!(
            "Mint service initialized (cache_enabled={}, shared_cache={}, ttl={}s)",
            config.cache.enabled,
            config.cache.url.is_some(),
            config.cache.ttl_secs
        );

        Ok(MintService {
            resolver,
            authorizer,
            events_tx,
            local_cache,
        })
    }
}

/// The four caller-facing operations plus the cached contract reads.
pub struct MintService {
    resolver: Arc<TokenResolver>,
    authorizer: MintAuthorizer,
    events_tx: ServiceEventsSender,
    local_cache: Option<TtlCache>,
}

impl MintService {
    /// Token id for a content id, generating it on first use.
    ///
    /// # Errors
    ///
    /// See [`TokenResolver::resolve_or_create`].
    pub async fn resolve_token_id(&self, content_id: &ContentId) -> Result<TokenId> {
        self.resolver.resolve_or_create(content_id).await
    }

    /// Content id a token was generated for.
    ///
    /// # Errors
    ///
    /// See [`TokenResolver::resolve_content_id`].
    pub async fn resolve_content_id(&self, token_id: TokenId) -> Result<ContentId> {
        self.resolver.resolve_content_id(token_id).await
    }

    /// Explicit first-time generation.
    ///
    /// # Errors
    ///
    /// See [`TokenResolver::generate_explicit`].
    pub async fn generate_token_id(&self, content_id: &ContentId) -> Result<TokenId> {
        self.resolver.generate_explicit(content_id).await
    }

    /// Validate and submit a mint.
    ///
    /// # Errors
    ///
    /// See [`MintAuthorizer::mint`].
    pub async fn mint(&self, request: &MintRequest) -> Result<Option<TxReceipt>> {
        self.authorizer.mint(request).await
    }

    /// Cached mint price.
    ///
    /// # Errors
    ///
    /// See [`TokenResolver::mint_price`].
    pub async fn mint_price(&self) -> Result<U256> {
        self.resolver.mint_price().await
    }

    /// Cached max mint limit.
    ///
    /// # Errors
    ///
    /// See [`TokenResolver::max_mint_limit`].
    pub async fn max_mint_limit(&self) -> Result<U256> {
        self.resolver.max_mint_limit().await
    }

    /// Cached mint count for a token.
    ///
    /// # Errors
    ///
    /// See [`TokenResolver::token_mint_count`].
    pub async fn token_mint_count(&self, token_id: TokenId) -> Result<U256> {
        self.resolver.token_mint_count(token_id).await
    }

    /// Subscribe to service events.
    #[must_use]
    pub fn subscribe_events(&self) -> ServiceEventsChannel {
        self.events_tx.subscribe()
    }

    /// Statistics for the in-process cache, if the service built one.
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.local_cache.as_ref().map(TtlCache::stats)
    }
}
