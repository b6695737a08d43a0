// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access/refresh token issuance and validation.
//!
//! ## Access tokens
//!
//! Stateless. Valid iff the signature (access secret) checks out and `exp` is
//! in the future.
//!
//! ## Refresh tokens
//!
//! Same shape, refresh secret, longer TTL. Additionally only valid while they
//! equal the entry in the [`RefreshTokenStore`] for their identity. Issuing a
//! refresh token overwrites that entry, so at most one is ever usable.
//!
//! `validate_*` only checks bytes, signature and expiry. `extract_*` also
//! requires a usable identity (and, for refresh tokens, an active session).

use std::time::Duration;

use super::codec::{DecodeError, SigningSecret, TokenClaims, TokenCodec};
use super::AuthError;
use crate::config::AuthConfig;
use crate::storage::RefreshTokenStore;

/// Issues, validates and revokes member tokens.
pub struct TokenService {
    codec: TokenCodec,
    access_secret: SigningSecret,
    refresh_secret: SigningSecret,
    access_ttl: Duration,
    refresh_ttl: Duration,
    refresh_tokens: RefreshTokenStore,
}

impl TokenService {
    pub fn new(config: &AuthConfig, refresh_tokens: RefreshTokenStore) -> Self {
        Self {
            codec: TokenCodec::new(),
            access_secret: config.access_secret.clone(),
            refresh_secret: config.refresh_secret.clone(),
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            refresh_tokens,
        }
    }

    /// Sign a new access token for `identity`. No side effects.
    pub fn issue_access_token(&self, identity: &str) -> Result<String, AuthError> {
        self.codec
            .encode(Some(identity), &self.access_secret, self.access_ttl)
            .map_err(|e| AuthError::Internal(format!("failed to sign access token: {e}")))
    }

    /// Sign a new refresh token for `identity` and make it the only valid one.
    ///
    /// The store entry gets the same TTL as the token.
    pub async fn issue_refresh_token(&self, identity: &str) -> Result<String, AuthError> {
        let token = self
            .codec
            .encode(Some(identity), &self.refresh_secret, self.refresh_ttl)
            .map_err(|e| AuthError::Internal(format!("failed to sign refresh token: {e}")))?;
        self.refresh_tokens
            .save(identity, &token, self.refresh_ttl)
            .await?;
        Ok(token)
    }

    /// Check an access token's structure, signature and expiry.
    pub fn validate_access_token(&self, token: &str) -> Result<(), AuthError> {
        self.decode_access(token).map(|_| ())
    }

    /// Check a refresh token's structure, signature and expiry.
    pub fn validate_refresh_token(&self, token: &str) -> Result<(), AuthError> {
        self.decode_refresh(token).map(|_| ())
    }

    /// Identity carried by a valid access token.
    pub fn extract_identity_from_access_token(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.decode_access(token)?;
        claims
            .identity()
            .map(str::to_string)
            .ok_or(AuthError::AccessTokenEmailMissing)
    }

    /// Identity carried by a valid refresh token that is still the active one.
    pub async fn extract_identity_from_refresh_token(
        &self,
        token: &str,
    ) -> Result<String, AuthError> {
        let claims = self.decode_refresh(token)?;
        let identity = claims
            .identity()
            .ok_or(AuthError::RefreshTokenEmailMissing)?;

        match self.refresh_tokens.current(identity).await? {
            Some(current) if current == token.trim() => Ok(identity.to_string()),
            Some(_) => {
                tracing::debug!(identity, "Refresh token superseded by a newer one");
                Err(AuthError::UserNotLoggedIn)
            }
            None => Err(AuthError::UserNotLoggedIn),
        }
    }

    /// Drop the active refresh token for `identity`.
    ///
    /// Fails with [`AuthError::UserNotLoggedIn`] if there is none, so a second
    /// logout is observable.
    pub async fn revoke_refresh_token(&self, identity: &str) -> Result<(), AuthError> {
        if !self.refresh_tokens.is_active(identity).await? {
            return Err(AuthError::UserNotLoggedIn);
        }
        self.refresh_tokens.remove(identity).await?;
        Ok(())
    }

    fn decode_access(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.codec
            .decode(token, &self.access_secret)
            .map_err(access_error)
    }

    fn decode_refresh(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.codec
            .decode(token, &self.refresh_secret)
            .map_err(refresh_error)
    }
}

fn access_error(e: DecodeError) -> AuthError {
    match e {
        DecodeError::Empty => AuthError::EmptyAccessToken,
        DecodeError::Malformed => AuthError::MalformedAccessToken,
        DecodeError::UnsupportedAlgorithm => AuthError::UnsupportedAccessToken,
        DecodeError::Expired => AuthError::ExpiredAccessToken,
        DecodeError::InvalidSignature | DecodeError::Invalid(_) => AuthError::InvalidAccessToken,
    }
}

fn refresh_error(e: DecodeError) -> AuthError {
    match e {
        DecodeError::Expired => AuthError::ExpiredRefreshToken,
        _ => AuthError::InvalidRefreshToken,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use proptest::prelude::*;

    use crate::storage::InMemoryTtlCache;
    use crate::testing::test_auth_config;

    fn service() -> TokenService {
        let store = RefreshTokenStore::new(Arc::new(InMemoryTtlCache::new(64)));
        TokenService::new(&test_auth_config(), store)
    }

    #[test]
    fn access_token_round_trips_identity() {
        let tokens = service();
        let token = tokens.issue_access_token("a@x.com").unwrap();

        tokens.validate_access_token(&token).unwrap();
        assert_eq!(
            tokens.extract_identity_from_access_token(&token).unwrap(),
            "a@x.com"
        );
    }

    #[tokio::test]
    async fn refresh_token_round_trips_identity() {
        let tokens = service();
        let token = tokens.issue_refresh_token("a@x.com").await.unwrap();

        assert_eq!(
            tokens
                .extract_identity_from_refresh_token(&token)
                .await
                .unwrap(),
            "a@x.com"
        );
    }

    #[tokio::test]
    async fn second_refresh_token_supersedes_the_first() {
        let tokens = service();
        let old = tokens.issue_refresh_token("a@x.com").await.unwrap();
        let new = tokens.issue_refresh_token("a@x.com").await.unwrap();
        assert_ne!(old, new);

        // The old token is still well-formed and unexpired on its own.
        tokens.validate_refresh_token(&old).unwrap();
        assert_eq!(
            tokens.extract_identity_from_refresh_token(&old).await,
            Err(AuthError::UserNotLoggedIn)
        );
        assert!(tokens.extract_identity_from_refresh_token(&new).await.is_ok());
    }

    #[tokio::test]
    async fn revoke_twice_fails_the_second_time() {
        let tokens = service();
        tokens.issue_refresh_token("a@x.com").await.unwrap();

        tokens.revoke_refresh_token("a@x.com").await.unwrap();
        assert_eq!(
            tokens.revoke_refresh_token("a@x.com").await,
            Err(AuthError::UserNotLoggedIn)
        );
    }

    #[tokio::test]
    async fn revoked_refresh_token_is_rejected() {
        let tokens = service();
        let token = tokens.issue_refresh_token("a@x.com").await.unwrap();
        tokens.revoke_refresh_token("a@x.com").await.unwrap();

        assert_eq!(
            tokens.extract_identity_from_refresh_token(&token).await,
            Err(AuthError::UserNotLoggedIn)
        );
    }

    #[test]
    fn access_decode_failures_map_to_access_taxonomy() {
        let tokens = service();
        assert_eq!(
            tokens.validate_access_token(""),
            Err(AuthError::EmptyAccessToken)
        );
        assert_eq!(
            tokens.validate_access_token("garbage"),
            Err(AuthError::MalformedAccessToken)
        );

        // Signed with the refresh secret: signature mismatch.
        let wrong_secret = TokenCodec::new()
            .encode(
                Some("a@x.com"),
                &test_auth_config().refresh_secret,
                Duration::from_secs(60),
            )
            .unwrap();
        assert_eq!(
            tokens.validate_access_token(&wrong_secret),
            Err(AuthError::InvalidAccessToken)
        );
    }

    #[test]
    fn expired_access_token_is_reported_as_expired() {
        let tokens = service();
        let expired = TokenCodec::new()
            .encode(
                Some("a@x.com"),
                &test_auth_config().access_secret,
                Duration::ZERO,
            )
            .unwrap();
        assert_eq!(
            tokens.validate_access_token(&expired),
            Err(AuthError::ExpiredAccessToken)
        );
    }

    #[test]
    fn access_token_without_identity_is_rejected_on_extraction_only() {
        let tokens = service();
        let anonymous = TokenCodec::new()
            .encode(None, &test_auth_config().access_secret, Duration::from_secs(60))
            .unwrap();

        tokens.validate_access_token(&anonymous).unwrap();
        assert_eq!(
            tokens.extract_identity_from_access_token(&anonymous),
            Err(AuthError::AccessTokenEmailMissing)
        );
    }

    #[tokio::test]
    async fn refresh_decode_failures_collapse_to_two_kinds() {
        let tokens = service();
        assert_eq!(
            tokens.validate_refresh_token("garbage"),
            Err(AuthError::InvalidRefreshToken)
        );

        let expired = TokenCodec::new()
            .encode(
                Some("a@x.com"),
                &test_auth_config().refresh_secret,
                Duration::ZERO,
            )
            .unwrap();
        assert_eq!(
            tokens.validate_refresh_token(&expired),
            Err(AuthError::ExpiredRefreshToken)
        );

        // An access token is not a refresh token.
        let access = tokens.issue_access_token("a@x.com").unwrap();
        assert_eq!(
            tokens.extract_identity_from_refresh_token(&access).await,
            Err(AuthError::InvalidRefreshToken)
        );
    }

    #[tokio::test]
    async fn refresh_token_without_identity_is_rejected() {
        let tokens = service();
        let token = TokenCodec::new()
            .encode(None, &test_auth_config().refresh_secret, Duration::from_secs(60))
            .unwrap();
        assert_eq!(
            tokens.extract_identity_from_refresh_token(&token).await,
            Err(AuthError::RefreshTokenEmailMissing)
        );
    }

    fn identity_strategy() -> impl Strategy<Value = String> {
        "\\PC{1,48}".prop_filter("identity must not be blank", |s| !s.trim().is_empty())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn any_identity_survives_access_token(identity in identity_strategy()) {
            let tokens = service();
            let token = tokens.issue_access_token(&identity).unwrap();
            prop_assert_eq!(tokens.extract_identity_from_access_token(&token).unwrap(), identity);
        }

        #[test]
        fn any_identity_survives_refresh_token(identity in identity_strategy()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            let extracted = runtime.block_on(async {
                let tokens = service();
                let token = tokens.issue_refresh_token(&identity).await.unwrap();
                tokens.extract_identity_from_refresh_token(&token).await
            });
            prop_assert_eq!(extracted.unwrap(), identity);
        }
    }
}
