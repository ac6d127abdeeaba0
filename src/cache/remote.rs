//! Redis-backed cache store, shared by every process pointed at the same server.

use crate::cache::CacheStore;
use crate::error::{Error, Result};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// How long to wait for the server before treating the cache as down.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

fn cache_error(e: impl std::fmt::Display) -> Error {
    Error::Cache(e.to_string())
}

/// Cache store on a Redis server.
///
/// The connection is opened on first use and dropped after any failed
/// command, so the next call reconnects. Every failure is reported as
/// [`Error::Cache`].
pub struct RedisCache {
    client: redis::Client,
    conn: Mutex<Option<MultiplexedConnection>>,
}

impl RedisCache {
    /// Create a store for the server at `url` (`redis://host:port/db`).
    ///
    /// No connection is made until the first command.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is not a valid Redis URL.
    pub fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| Error::Config(format!("Invalid cache URL: {e}")))?;
        Ok(Self {
            client,
            conn: Mutex::new(None),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        let mut slot = self.conn.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = tokio::time::timeout(
            CONNECT_TIMEOUT,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| Error::Cache("connection timed out".to_string()))?
        .map_err(cache_error)?;

        info!("Connected to cache server");
        *slot = Some(conn.clone());
        Ok(conn)
    }

    async fn reset(&self) {
        debug!("Dropping cache connection after a failed command");
        *self.conn.lock().await = None;
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.reset().await;
                Err(cache_error(e))
            }
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        // SET ... EX takes whole seconds; zero would be rejected
        let seconds = ttl.as_secs().max(1);
        let mut conn = self.connection().await?;
        match conn.set_ex::<_, _, ()>(key, value, seconds).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.reset().await;
                Err(cache_error(e))
            }
        }
    }
}
