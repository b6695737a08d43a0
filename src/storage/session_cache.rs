// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session identity cache: identity → internal member id.
//!
//! Soft state only. A miss is never an error, and the user store stays
//! authoritative; entries just spare a lookup for `ttl` after each write.

use std::sync::Arc;
use std::time::Duration;

use super::{CacheResult, TtlCache};
use crate::auth::MemberId;

const KEY_PREFIX: &str = "session:";

/// Default entry lifetime (30 minutes).
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Identity → member id keyspace over the shared TTL cache.
#[derive(Clone)]
pub struct SessionIdentityCache {
    cache: Arc<dyn TtlCache>,
    ttl: Duration,
}

impl SessionIdentityCache {
    pub fn new(cache: Arc<dyn TtlCache>) -> Self {
        Self {
            cache,
            ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Override the entry lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn key(identity: &str) -> String {
        format!("{KEY_PREFIX}{identity}")
    }

    /// Cached member id for `identity`.
    ///
    /// An unparsable entry is treated as a miss.
    pub async fn get(&self, identity: &str) -> CacheResult<Option<MemberId>> {
        let Some(raw) = self.cache.get(&Self::key(identity)).await? else {
            return Ok(None);
        };
        match raw.parse::<MemberId>() {
            Ok(member_id) => Ok(Some(member_id)),
            Err(_) => {
                tracing::warn!(identity, "Discarding unparsable session cache entry");
                Ok(None)
            }
        }
    }

    pub async fn put(&self, identity: &str, member_id: MemberId) -> CacheResult<()> {
        self.cache
            .set(&Self::key(identity), &member_id.to_string(), self.ttl)
            .await
    }

    pub async fn evict(&self, identity: &str) -> CacheResult<()> {
        self.cache.delete(&Self::key(identity)).await
    }
}
