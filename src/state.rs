// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{Authenticator, IdentityResolver, SessionService, TokenService};
use crate::config::AuthConfig;
use crate::members::{CredentialVerifier, UserStore};
use crate::storage::{RefreshTokenStore, SessionIdentityCache, TtlCache};

/// Shared state for all handlers.
///
/// Both keyspaces live in the same [`TtlCache`]; their key prefixes keep them
/// apart.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub resolver: Arc<IdentityResolver>,
    pub sessions: Arc<SessionService>,
    pub cache: Arc<dyn TtlCache>,
}

impl AppState {
    pub fn new(
        config: &AuthConfig,
        cache: Arc<dyn TtlCache>,
        users: Arc<dyn UserStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(
            config,
            RefreshTokenStore::new(cache.clone()),
        ));
        let resolver = Arc::new(IdentityResolver::new(
            SessionIdentityCache::new(cache.clone()).with_ttl(config.session_ttl),
            users.clone(),
        ));
        let sessions = Arc::new(SessionService::new(
            tokens.clone(),
            resolver.clone(),
            users,
            verifier,
        ));

        Self {
            tokens,
            resolver,
            sessions,
            cache,
        }
    }

    /// State for the authentication middleware.
    pub fn authenticator(&self) -> Authenticator {
        Authenticator::new(self.tokens.clone(), self.resolver.clone())
    }
}
