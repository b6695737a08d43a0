// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process LRU cache with per-entry TTL.
//!
//! Used when no external cache service is configured. Entries are evicted
//! lazily on access once expired, and by LRU order once capacity is reached.
//! State does not survive a restart and is not shared between instances.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;

use super::{CacheError, CacheResult, TtlCache};

/// Default capacity when none is configured.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// Cached entry: value + expiry instant.
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// In-process TTL cache backed by an LRU map.
pub struct InMemoryTtlCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
}

impl InMemoryTtlCache {
    /// Create a new cache holding at most `capacity` keys.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of keys currently held, including ones that expired but were
    /// not yet touched.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTtlCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl TtlCache for InMemoryTtlCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        match entries.get(key) {
            Some(entry) if entry.is_live() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.pop(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        if ttl.is_zero() {
            entries.pop(key);
            return Ok(());
        }
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(CacheError::TtlOutOfRange(ttl))?;
        entries.put(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut entries = self.entries.lock().map_err(|_| CacheError::Poisoned)?;
        entries.pop(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let cache = InMemoryTtlCache::new(10);
        assert!(cache.get("k").await.unwrap().is_none());

        cache.set("k", "v", HOUR).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
        assert!(cache.exists("k").await.unwrap());
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let cache = InMemoryTtlCache::new(10);
        cache.set("k", "first", HOUR).await.unwrap();
        cache.set("k", "second", HOUR).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn delete_removes_entry_and_tolerates_absent_keys() {
        let cache = InMemoryTtlCache::new(10);
        cache.set("k", "v", HOUR).await.unwrap();
        cache.delete("k").await.unwrap();
        assert!(!cache.exists("k").await.unwrap());

        cache.delete("never-set").await.unwrap();
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = InMemoryTtlCache::new(10);
        cache
            .set("k", "v", Duration::from_millis(1))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(cache.get("k").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn zero_ttl_stores_nothing() {
        let cache = InMemoryTtlCache::new(10);
        cache.set("k", "v", HOUR).await.unwrap();
        cache.set("k", "v2", Duration::ZERO).await.unwrap();
        assert!(cache.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unrepresentable_ttl_is_an_error_not_a_panic() {
        let cache = InMemoryTtlCache::new(10);
        cache.set("k", "v", HOUR).await.unwrap();

        let err = cache
            .set("k", "v2", Duration::from_secs(u64::MAX))
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::TtlOutOfRange(_)));
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn capacity_evicts_least_recently_used() {
        let cache = InMemoryTtlCache::new(2);
        cache.set("a", "1", HOUR).await.unwrap();
        cache.set("b", "2", HOUR).await.unwrap();
        cache.get("a").await.unwrap();
        cache.set("c", "3", HOUR).await.unwrap();

        assert!(cache.exists("a").await.unwrap());
        assert!(!cache.exists("b").await.unwrap());
        assert!(cache.exists("c").await.unwrap());
    }
}
