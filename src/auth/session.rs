// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, logout, token reissue and account withdrawal.

use std::sync::Arc;

use super::{AuthError, IdentityResolver, MemberId, TokenService};
use crate::members::{normalize_identity, CredentialVerifier, UserStore};

/// A freshly issued token pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokens {
    pub member_id: MemberId,
    pub access_token: String,
    pub refresh_token: String,
}

/// Orchestrates the session lifecycle over tokens, resolver and collaborators.
pub struct SessionService {
    tokens: Arc<TokenService>,
    resolver: Arc<IdentityResolver>,
    users: Arc<dyn UserStore>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl SessionService {
    pub fn new(
        tokens: Arc<TokenService>,
        resolver: Arc<IdentityResolver>,
        users: Arc<dyn UserStore>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            tokens,
            resolver,
            users,
            verifier,
        }
    }

    /// Verify credentials and issue an access/refresh pair.
    ///
    /// Any refresh token issued earlier for this identity stops working.
    pub async fn login(&self, identity: &str, password: &str) -> Result<IssuedTokens, AuthError> {
        let identity = normalize_identity(identity);

        let Some(credentials) = self.users.find_credentials(&identity).await? else {
            tracing::info!(identity = %identity, "Login rejected: unknown member");
            return Err(AuthError::UnauthorizedUser);
        };

        if !self
            .verifier
            .matches(password, &credentials.password_hash, &credentials.salt)
        {
            tracing::info!(identity = %identity, "Login rejected: password mismatch");
            return Err(AuthError::UnauthorizedPassword);
        }

        let tokens = self.issue_pair(&identity, credentials.member_id).await?;
        tracing::info!(identity = %identity, member_id = tokens.member_id, "Member logged in");
        Ok(tokens)
    }

    /// Revoke the refresh token of the member holding `access_token`.
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let identity = self.tokens.extract_identity_from_access_token(access_token)?;
        self.tokens.revoke_refresh_token(&identity).await?;
        tracing::info!(identity = %identity, "Member logged out");
        Ok(())
    }

    /// Exchange the active refresh token for a new pair (rotation).
    pub async fn reissue(&self, refresh_token: &str) -> Result<IssuedTokens, AuthError> {
        let identity = self
            .tokens
            .extract_identity_from_refresh_token(refresh_token)
            .await?;

        let member_id = self
            .users
            .find_internal_id_by_identity(&identity)
            .await?
            .ok_or(AuthError::UnauthorizedUser)?;

        let tokens = self.issue_pair(&identity, member_id).await?;
        tracing::info!(identity = %identity, member_id, "Token pair reissued");
        Ok(tokens)
    }

    /// Log the member out, then delete them.
    ///
    /// Revocation runs first: if deletion fails the member is at least no
    /// longer able to refresh. Once the member is deleted, a failed cache
    /// eviction is only logged; the entry expires on its own and the user
    /// store is authoritative.
    pub async fn withdrawal(&self, access_token: &str) -> Result<(), AuthError> {
        let identity = self.tokens.extract_identity_from_access_token(access_token)?;
        self.tokens.revoke_refresh_token(&identity).await?;
        self.users.delete_by_identity(&identity).await?;
        if let Err(e) = self.resolver.forget(&identity).await {
            tracing::warn!(
                identity = %identity,
                error = %e,
                "Failed to evict session cache entry after withdrawal"
            );
        }
        tracing::info!(identity = %identity, "Member withdrew");
        Ok(())
    }

    async fn issue_pair(
        &self,
        identity: &str,
        member_id: MemberId,
    ) -> Result<IssuedTokens, AuthError> {
        let access_token = self.tokens.issue_access_token(identity)?;
        let refresh_token = self.tokens.issue_refresh_token(identity).await?;
        Ok(IssuedTokens {
            member_id,
            access_token,
            refresh_token,
        })
    }
}
