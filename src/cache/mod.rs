//! Cache store adapter.
//!
//! The cache is an acceleration layer in front of the chain and never a
//! source of truth. Every entry is derived data with a TTL; nothing is
//! invalidated explicitly.
//!
//! ```text
//! read request
//!      │
//!      ▼
//! ┌──────────────┐
//! │ CacheStore   │── error ──┐
//! └──────┬───────┘           │
//!        │                   │
//!   ┌────┴────┐              │
//!   │         │              │
//!  HIT      MISS ◄───────────┘
//!   │         │
//!   ▼         ▼
//! return   chain read ──► set(key, value, ttl) ──► return
//! ```
//!
//! [`RedisCache`] shares entries between processes; [`TtlCache`] keeps them
//! in memory for a single process.

mod keys;
mod remote;
mod store;

pub use keys::CacheKey;
pub use remote::RedisCache;
pub use store::{CacheStats, CacheStore, NullCache, TtlCache, DEFAULT_CACHE_TTL, MAX_CACHE_TTL};
