// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user store.
//!
//! Stands in for the member database in development and tests. Records are
//! keyed by normalised identity; ids are assigned sequentially from 1.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::credentials::{generate_salt, hash_password};
use super::{normalize_identity, StoredCredentials, UserStore, UserStoreError};
use crate::auth::MemberId;

pub struct InMemoryUserStore {
    members: RwLock<HashMap<String, StoredCredentials>>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            members: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Register a member with a freshly salted password hash.
    ///
    /// Fails with [`UserStoreError::AlreadyExists`] if the identity is taken.
    pub async fn register(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<MemberId, UserStoreError> {
        let identity = normalize_identity(identity);
        let mut members = self.members.write().await;
        if members.contains_key(&identity) {
            return Err(UserStoreError::AlreadyExists(identity));
        }

        let member_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let salt = generate_salt();
        members.insert(
            identity,
            StoredCredentials {
                member_id,
                password_hash: hash_password(password, &salt),
                salt,
            },
        );
        Ok(member_id)
    }

    pub async fn len(&self) -> usize {
        self.members.read().await.len()
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_internal_id_by_identity(
        &self,
        identity: &str,
    ) -> Result<Option<MemberId>, UserStoreError> {
        Ok(self
            .members
            .read()
            .await
            .get(identity)
            .map(|record| record.member_id))
    }

    async fn find_credentials(
        &self,
        identity: &str,
    ) -> Result<Option<StoredCredentials>, UserStoreError> {
        Ok(self.members.read().await.get(identity).cloned())
    }

    async fn delete_by_identity(&self, identity: &str) -> Result<(), UserStoreError> {
        if self.members.write().await.remove(identity).is_some() {
            Ok(())
        } else {
            Err(UserStoreError::NotFound(identity.to_string()))
        }
    }
}
