// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Refresh token store: the single currently-valid refresh token per identity.
//!
//! A refresh token is only honoured while it equals the value stored here.
//! Issuing a new one overwrites the entry, which is what revokes the old one.

use std::sync::Arc;
use std::time::Duration;

use super::{CacheResult, TtlCache};

const KEY_PREFIX: &str = "refresh:";

/// Refresh token keyspace over the shared TTL cache.
#[derive(Clone)]
pub struct RefreshTokenStore {
    cache: Arc<dyn TtlCache>,
}

impl RefreshTokenStore {
    pub fn new(cache: Arc<dyn TtlCache>) -> Self {
        Self { cache }
    }

    fn key(identity: &str) -> String {
        format!("{KEY_PREFIX}{identity}")
    }

    /// Record `token` as the only valid refresh token for `identity`.
    pub async fn save(&self, identity: &str, token: &str, ttl: Duration) -> CacheResult<()> {
        self.cache.set(&Self::key(identity), token, ttl).await
    }

    /// The refresh token currently registered for `identity`, if any.
    pub async fn current(&self, identity: &str) -> CacheResult<Option<String>> {
        self.cache.get(&Self::key(identity)).await
    }

    /// Whether `identity` is logged in (holds a live refresh token).
    pub async fn is_active(&self, identity: &str) -> CacheResult<bool> {
        self.cache.exists(&Self::key(identity)).await
    }

    pub async fn remove(&self, identity: &str) -> CacheResult<()> {
        self.cache.delete(&Self::key(identity)).await
    }
}
