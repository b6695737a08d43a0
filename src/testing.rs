// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::auth::{MemberId, SigningSecret};
use crate::config::AuthConfig;
use crate::members::{
    HmacCredentialVerifier, InMemoryUserStore, StoredCredentials, UserStore, UserStoreError,
};
use crate::state::AppState;
use crate::storage::{CacheError, CacheResult, InMemoryTtlCache, TtlCache};

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        access_secret: SigningSecret::new("test-access-secret-0123456789abcdef"),
        refresh_secret: SigningSecret::new("test-refresh-secret-0123456789abcdef"),
        access_ttl: Duration::from_secs(3600),
        refresh_ttl: Duration::from_secs(1_209_600),
        session_ttl: Duration::from_secs(1800),
    }
}

/// App state over in-memory backends. The user store is returned separately
/// so tests can register members.
pub fn test_state() -> (AppState, Arc<InMemoryUserStore>) {
    test_state_with_cache(Arc::new(InMemoryTtlCache::new(1024)))
}

pub fn test_state_with_cache(cache: Arc<dyn TtlCache>) -> (AppState, Arc<InMemoryUserStore>) {
    let users = Arc::new(InMemoryUserStore::new());
    let state = AppState::new(
        &test_auth_config(),
        cache,
        users.clone(),
        Arc::new(HmacCredentialVerifier),
    );
    (state, users)
}

/// Delegating store that counts identity lookups.
pub struct CountingUserStore {
    inner: InMemoryUserStore,
    lookups: AtomicUsize,
}

impl CountingUserStore {
    pub fn new(inner: InMemoryUserStore) -> Self {
        Self {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for CountingUserStore {
    async fn find_internal_id_by_identity(
        &self,
        identity: &str,
    ) -> Result<Option<MemberId>, UserStoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_internal_id_by_identity(identity).await
    }

    async fn find_credentials(
        &self,
        identity: &str,
    ) -> Result<Option<StoredCredentials>, UserStoreError> {
        self.inner.find_credentials(identity).await
    }

    async fn delete_by_identity(&self, identity: &str) -> Result<(), UserStoreError> {
        self.inner.delete_by_identity(identity).await
    }
}

/// Cache backend that is always down.
pub struct UnavailableCache;

#[async_trait]
impl TtlCache for UnavailableCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Poisoned)
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> CacheResult<()> {
        Err(CacheError::Poisoned)
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::Poisoned)
    }

    async fn exists(&self, _key: &str) -> CacheResult<bool> {
        Err(CacheError::Poisoned)
    }
}
