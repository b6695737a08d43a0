// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer credential parsing and Axum extractors.
//!
//! The two credential headers behave differently when the `Bearer ` prefix is
//! missing:
//!
//! - `Authorization` - treated as no credential at all (anonymous request)
//! - `Authorization-Refresh` - always an error, refresh has no anonymous path
//!
//! Use the extractors in handlers:
//!
//! ```rust,ignore
//! async fn me(Auth(ctx): Auth) -> impl IntoResponse {
//!     // ctx.member_id is a real member, never the anonymous sentinel
//! }
//! ```

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthContext, AuthError};

/// Header carrying the refresh token.
pub const REFRESH_AUTHORIZATION: &str = "authorization-refresh";

const BEARER_PREFIX: &str = "Bearer ";

/// Access token from `Authorization: Bearer <token>`.
///
/// `None` when the header is missing, not valid UTF-8, or lacks the prefix.
pub fn access_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// Refresh token from `Authorization-Refresh: Bearer <token>`.
pub fn refresh_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(REFRESH_AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::RefreshTokenExtractionFailed)
}

/// Extractor for a signed-in member.
///
/// Rejects anonymous requests with [`AuthError::UnauthorizedUser`]. Requires
/// the authentication middleware to have run for the route.
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthContext>() {
            Some(ctx) if !ctx.is_anonymous() => Ok(Auth(ctx.clone())),
            _ => Err(AuthError::UnauthorizedUser),
        }
    }
}

/// Extractor for whoever is calling, anonymous included.
pub struct CurrentContext(pub AuthContext);

impl<S> FromRequestParts<S> for CurrentContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentContext(
            parts
                .extensions
                .get::<AuthContext>()
                .cloned()
                .unwrap_or_default(),
        ))
    }
}

/// Raw access token, for endpoints that act on the token itself.
///
/// A missing credential is rejected with [`AuthError::EmptyAccessToken`].
pub struct AccessBearer(pub String);

impl<S> FromRequestParts<S> for AccessBearer
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        access_bearer(&parts.headers)
            .map(|token| AccessBearer(token.to_string()))
            .ok_or(AuthError::EmptyAccessToken)
    }
}

/// Raw refresh token from the `Authorization-Refresh` header.
pub struct RefreshBearer(pub String);

impl<S> FromRequestParts<S> for RefreshBearer
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        refresh_bearer(&parts.headers).map(|token| RefreshBearer(token.to_string()))
    }
}
