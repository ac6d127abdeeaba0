//! Cache store trait and in-process implementations.

use crate::error::{Error, Result};
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default capacity (100,000 entries).
const DEFAULT_CACHE_CAPACITY: usize = 100_000;

/// Uniform TTL for every derived value (24 hours).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24);

/// Longest TTL a configuration may ask for (one year).
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Key-value store with per-key expiry.
///
/// Implementations may fail; callers treat a failed `get` as a miss and
/// ignore a failed `set`.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch a live value, `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store a value that expires after `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

/// Cache statistics for monitoring.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses (including expired entries).
    pub misses: u64,
    /// Number of entries added.
    pub additions: u64,
    /// Number of entries dropped on read because they had expired.
    pub expirations: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process LRU cache with per-entry expiry.
///
/// Expired entries are evicted lazily when read; the LRU bound keeps memory
/// flat for entries that are never read again.
#[derive(Clone)]
pub struct TtlCache {
    inner: Arc<Mutex<LruCache<String, Entry>>>,
    stats: Arc<Mutex<CacheStats>>,
}

impl TtlCache {
    /// Create a new cache with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a new cache with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Arc::new(Mutex::new(LruCache::new(cap))),
            stats: Arc::new(Mutex::new(CacheStats::default())),
        }
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let mut cache = self.inner.lock();

        let (found, expired) = match cache.get(key) {
            Some(entry) if entry.expires_at > now => (Some(entry.value.clone()), false),
            Some(_) => (None, true),
            None => (None, false),
        };
        if expired {
            cache.pop(key);
        }
        drop(cache);

        let mut stats = self.stats.lock();
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        if expired {
            stats.expirations += 1;
        }

        found
    }

    fn insert(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| Error::Cache(format!("TTL of {}s for {key} is out of range", ttl.as_secs())))?;
        self.inner
            .lock()
            .put(key.to_string(), Entry { value, expires_at });
        self.stats.lock().additions += 1;
        Ok(())
    }

    /// Get current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    /// Get the current number of entries, including not-yet-evicted expired ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for TtlCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lookup(key))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        self.insert(key, value, ttl)
    }
}

/// A store that never holds anything. Every read is a miss.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCache;

#[async_trait]
impl CacheStore for NullCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<()> {
        Ok(())
    }
}
