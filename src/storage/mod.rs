// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # TTL Storage Module
//!
//! Every piece of server-side auth state lives in a TTL key-value cache:
//!
//! - the **Refresh Token Store** (`refresh:<identity>` → current refresh token)
//! - the **Session Identity Cache** (`session:<identity>` → internal member id)
//!
//! Both keyspaces share one [`TtlCache`] backend. In production that is Redis
//! (`CACHE_URL`); without it an in-process LRU cache is used.
//!
//! ## Consistency
//!
//! - No application-level locking; the backend's per-key `set`/`delete` are
//!   the only atomicity relied upon (last write wins).
//! - The refresh token store is never cached in-process on top of the
//!   backend. A stale read there would accept a revoked token.

pub mod redis_cache;
pub mod refresh_tokens;
pub mod session_cache;
pub mod ttl_cache;

use std::time::Duration;

use async_trait::async_trait;

pub use redis_cache::RedisTtlCache;
pub use refresh_tokens::RefreshTokenStore;
pub use session_cache::SessionIdentityCache;
pub use ttl_cache::InMemoryTtlCache;

/// Error type for TTL cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The cache service could not be reached or rejected the command
    #[error("cache backend error: {0}")]
    Backend(#[from] redis::RedisError),
    /// In-process cache lock was poisoned by a panicking writer
    #[error("cache lock poisoned")]
    Poisoned,
    /// Entry lifetime too large to represent as an expiry
    #[error("cache ttl out of range: {0:?}")]
    TtlOutOfRange(Duration),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// A string key-value store whose entries expire on their own.
#[async_trait]
pub trait TtlCache: Send + Sync {
    /// Current value for `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value, for `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Whether `key` currently holds an unexpired value.
    async fn exists(&self, key: &str) -> CacheResult<bool>;
}
