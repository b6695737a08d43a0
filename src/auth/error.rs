// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::members::UserStoreError;
use crate::storage::CacheError;

/// Authentication error type.
///
/// Every variant except [`AuthError::Internal`] is a client-facing 401 with a
/// stable numeric code. `Internal` covers cache or store outages and becomes a
/// bare 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Access token bytes are not a well-formed token
    MalformedAccessToken,
    /// Access token header names an algorithm we do not accept
    UnsupportedAccessToken,
    /// Access token signature checked out but it has expired
    ExpiredAccessToken,
    /// Access token is empty or blank
    EmptyAccessToken,
    /// Any other access token fault (bad signature included)
    InvalidAccessToken,
    /// Access token carries no identity claim
    AccessTokenEmailMissing,
    /// Refresh token is malformed, unsupported or otherwise unusable
    InvalidRefreshToken,
    /// Refresh token has expired
    ExpiredRefreshToken,
    /// Refresh token carries no identity claim
    RefreshTokenEmailMissing,
    /// No active refresh token is registered for the identity
    UserNotLoggedIn,
    /// `Authorization-Refresh` header missing or not `Bearer `-prefixed
    RefreshTokenExtractionFailed,
    /// No member matches the identity
    UnauthorizedUser,
    /// Password did not match
    UnauthorizedPassword,
    /// Unexpected failure (cache/store outage)
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<u32>,
}

impl AuthError {
    /// Stable snake_case identifier, `None` for internal errors.
    pub fn error_code(&self) -> Option<&'static str> {
        let code = match self {
            AuthError::MalformedAccessToken => "malformed_access_token",
            AuthError::UnsupportedAccessToken => "unsupported_access_token",
            AuthError::ExpiredAccessToken => "expired_access_token",
            AuthError::EmptyAccessToken => "empty_access_token",
            AuthError::InvalidAccessToken => "invalid_access_token",
            AuthError::AccessTokenEmailMissing => "access_token_email_missing",
            AuthError::InvalidRefreshToken => "invalid_refresh_token",
            AuthError::ExpiredRefreshToken => "expired_refresh_token",
            AuthError::RefreshTokenEmailMissing => "refresh_token_email_missing",
            AuthError::UserNotLoggedIn => "user_not_logged_in",
            AuthError::RefreshTokenExtractionFailed => "refresh_token_extraction_failed",
            AuthError::UnauthorizedUser => "unauthorized_user",
            AuthError::UnauthorizedPassword => "unauthorized_password",
            AuthError::Internal(_) => return None,
        };
        Some(code)
    }

    /// Stable numeric code, `None` for internal errors.
    pub fn code(&self) -> Option<u32> {
        let code = match self {
            AuthError::MalformedAccessToken => 40101,
            AuthError::UnsupportedAccessToken => 40102,
            AuthError::ExpiredAccessToken => 40103,
            AuthError::EmptyAccessToken => 40104,
            AuthError::InvalidAccessToken => 40105,
            AuthError::AccessTokenEmailMissing => 40106,
            AuthError::InvalidRefreshToken => 40107,
            AuthError::ExpiredRefreshToken => 40108,
            AuthError::RefreshTokenEmailMissing => 40109,
            AuthError::UserNotLoggedIn => 40110,
            AuthError::RefreshTokenExtractionFailed => 40111,
            AuthError::UnauthorizedUser => 40112,
            AuthError::UnauthorizedPassword => 40113,
            AuthError::Internal(_) => return None,
        };
        Some(code)
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MalformedAccessToken => write!(f, "Access token is malformed"),
            AuthError::UnsupportedAccessToken => {
                write!(f, "Access token algorithm is not supported")
            }
            AuthError::ExpiredAccessToken => write!(f, "Access token has expired"),
            AuthError::EmptyAccessToken => write!(f, "Access token is empty"),
            AuthError::InvalidAccessToken => write!(f, "Access token is invalid"),
            AuthError::AccessTokenEmailMissing => {
                write!(f, "Access token does not contain an email")
            }
            AuthError::InvalidRefreshToken => write!(f, "Refresh token is invalid"),
            AuthError::ExpiredRefreshToken => write!(f, "Refresh token has expired"),
            AuthError::RefreshTokenEmailMissing => {
                write!(f, "Refresh token does not contain an email")
            }
            AuthError::UserNotLoggedIn => write!(f, "User is not logged in"),
            AuthError::RefreshTokenExtractionFailed => write!(
                f,
                "Invalid refresh authorization header format (expected 'Bearer <token>')"
            ),
            AuthError::UnauthorizedUser => write!(f, "No valid member information"),
            AuthError::UnauthorizedPassword => write!(f, "Password does not match"),
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<CacheError> for AuthError {
    fn from(e: CacheError) -> Self {
        AuthError::Internal(e.to_string())
    }
}

impl From<UserStoreError> for AuthError {
    fn from(e: UserStoreError) -> Self {
        match e {
            UserStoreError::NotFound(_) => AuthError::UnauthorizedUser,
            other => AuthError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AuthError::Internal(detail) => {
                tracing::error!(error = %detail, "Authentication failed unexpectedly");
                AuthErrorBody {
                    error: "Internal server error".to_string(),
                    error_code: None,
                    code: None,
                }
            }
            _ => AuthErrorBody {
                error: self.to_string(),
                error_code: self.error_code(),
                code: self.code(),
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn taxonomy_errors_return_401_with_codes() {
        let response = AuthError::MalformedAccessToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error_code"], "malformed_access_token");
        assert_eq!(body["code"], 40101);
    }

    #[tokio::test]
    async fn internal_error_returns_500_without_code_or_detail() {
        let response = AuthError::Internal("redis down".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body.get("code").is_none());
        assert!(body.get("error_code").is_none());
        assert!(!body["error"].as_str().unwrap().contains("redis"));
    }

    #[test]
    fn numeric_codes_are_unique() {
        let all = [
            AuthError::MalformedAccessToken,
            AuthError::UnsupportedAccessToken,
            AuthError::ExpiredAccessToken,
            AuthError::EmptyAccessToken,
            AuthError::InvalidAccessToken,
            AuthError::AccessTokenEmailMissing,
            AuthError::InvalidRefreshToken,
            AuthError::ExpiredRefreshToken,
            AuthError::RefreshTokenEmailMissing,
            AuthError::UserNotLoggedIn,
            AuthError::RefreshTokenExtractionFailed,
            AuthError::UnauthorizedUser,
            AuthError::UnauthorizedPassword,
        ];
        let mut codes: Vec<u32> = all.iter().filter_map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn missing_member_in_store_maps_to_unauthorized_user() {
        let err: AuthError = UserStoreError::NotFound("a@x.com".to_string()).into();
        assert_eq!(err, AuthError::UnauthorizedUser);

        let err: AuthError = UserStoreError::Unavailable("timeout".to_string()).into();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
