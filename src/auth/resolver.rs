// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity → member id resolution (cache-aside).
//!
//! 1. Read the session identity cache; a hit returns immediately.
//! 2. On a miss, ask the user store.
//! 3. Found: write the id back to the cache and return it.
//! 4. Not found anywhere: [`AuthError::UnauthorizedUser`].
//!
//! Concurrent misses for one identity are not coalesced. Both callers query
//! the store and both write the same value.

use std::sync::Arc;

use super::{AuthError, MemberId};
use crate::members::UserStore;
use crate::storage::SessionIdentityCache;

pub struct IdentityResolver {
    sessions: SessionIdentityCache,
    users: Arc<dyn UserStore>,
}

impl IdentityResolver {
    pub fn new(sessions: SessionIdentityCache, users: Arc<dyn UserStore>) -> Self {
        Self { sessions, users }
    }

    pub async fn resolve(&self, identity: &str) -> Result<MemberId, AuthError> {
        if let Some(member_id) = self.sessions.get(identity).await? {
            return Ok(member_id);
        }

        let member_id = self
            .users
            .find_internal_id_by_identity(identity)
            .await?
            .ok_or(AuthError::UnauthorizedUser)?;

        self.sessions.put(identity, member_id).await?;
        tracing::debug!(identity, member_id, "Cached session identity");
        Ok(member_id)
    }

    /// Drop any cached id for `identity`.
    pub async fn forget(&self, identity: &str) -> Result<(), AuthError> {
        self.sessions.evict(identity).await?;
        Ok(())
    }
}
