// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Redis-backed TTL cache.
//!
//! Shared by every server instance, so a refresh token revoked on one node is
//! rejected by all of them. Connection loss and timeouts are handled by the
//! `ConnectionManager`; nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{CacheResult, TtlCache};

/// TTL cache over a Redis connection manager.
#[derive(Clone)]
pub struct RedisTtlCache {
    conn: ConnectionManager,
}

impl RedisTtlCache {
    /// Connect to the Redis server at `url` (e.g. `redis://127.0.0.1:6379/0`).
    pub async fn connect(url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        tracing::info!("Connected to TTL cache service");
        Ok(Self { conn })
    }
}

#[async_trait]
impl TtlCache for RedisTtlCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn.clone();
        let value = conn.get::<_, Option<String>>(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        // SET EX rejects 0; a zero TTL means the entry is already gone.
        let seconds = ttl.as_secs();
        if seconds == 0 {
            return self.delete(key).await;
        }
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.conn.clone();
        let exists = conn.exists::<_, bool>(key).await?;
        Ok(exists)
    }
}
