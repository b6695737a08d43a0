// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Runs once per request before the handler:
//!
//! 1. No `Authorization: Bearer` credential → anonymous context, continue.
//! 2. Credential present → validate it; any decode failure → 401, stop.
//! 3. Extract identity → resolve member id → install context, continue.
//! 4. Cache/store outage → 500, stop.
//!
//! The resulting [`AuthContext`] goes into the request extensions and is read
//! by the extractors in [`super::extractor`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/members/me", get(me))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.authenticator(),
//!         authenticate,
//!     ));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::extractor::access_bearer;
use super::{AuthContext, AuthError, IdentityResolver, TokenService};

/// State needed by [`authenticate`].
#[derive(Clone)]
pub struct Authenticator {
    tokens: Arc<TokenService>,
    resolver: Arc<IdentityResolver>,
}

impl Authenticator {
    pub fn new(tokens: Arc<TokenService>, resolver: Arc<IdentityResolver>) -> Self {
        Self { tokens, resolver }
    }

    /// Turn an access token into the member's context.
    pub async fn authenticate_token(&self, token: &str) -> Result<AuthContext, AuthError> {
        self.tokens.validate_access_token(token)?;
        let identity = self.tokens.extract_identity_from_access_token(token)?;
        let member_id = self.resolver.resolve(&identity).await?;
        Ok(AuthContext::authenticated(member_id))
    }
}

/// Authentication middleware function.
pub async fn authenticate(
    State(authenticator): State<Authenticator>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = access_bearer(request.headers()).map(str::to_owned);

    let context = match token {
        None => AuthContext::anonymous(),
        Some(token) => match authenticator.authenticate_token(&token).await {
            Ok(context) => context,
            Err(e) => {
                tracing::warn!(
                    path = %request.uri().path(),
                    error_code = e.error_code().unwrap_or("internal_error"),
                    "Rejected request credential"
                );
                return e.into_response();
            }
        },
    };

    request.extensions_mut().insert(context);
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use crate::auth::CurrentContext;
    use crate::testing::test_state;

    fn app(authenticator: Authenticator, hits: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(move |CurrentContext(ctx): CurrentContext| {
                    let hits = hits.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        ctx.member_id.to_string()
                    }
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                authenticator,
                authenticate,
            ))
    }

    async fn call(app: Router, authorization: Option<&str>) -> (StatusCode, String) {
        let mut request = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            request = request.header("Authorization", value);
        }
        let response = app
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn no_credential_passes_through_anonymously() {
        let (state, _users) = test_state();
        let hits = Arc::new(AtomicUsize::new(0));

        let (status, body) = call(app(state.authenticator(), hits.clone()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "-1");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_anonymous() {
        let (state, _users) = test_state();
        let hits = Arc::new(AtomicUsize::new(0));

        let (status, body) = call(
            app(state.authenticator(), hits),
            Some("Basic dXNlcjpwdw=="),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "-1");
    }

    #[tokio::test]
    async fn garbage_bearer_is_rejected_before_handler() {
        let (state, _users) = test_state();
        let hits = Arc::new(AtomicUsize::new(0));

        let (status, body) =
            call(app(state.authenticator(), hits.clone()), Some("Bearer garbage")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("malformed_access_token"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_token_installs_member_context() {
        let (state, users) = test_state();
        let id = users.register("a@x.com", "pw").await.unwrap();
        let token = state.tokens.issue_access_token("a@x.com").unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let (status, body) = call(
            app(state.authenticator(), hits),
            Some(&format!("Bearer {token}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, id.to_string());
    }

    #[tokio::test]
    async fn valid_token_for_deleted_member_is_unauthorized() {
        let (state, _users) = test_state();
        let token = state.tokens.issue_access_token("ghost@x.com").unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let (status, body) = call(
            app(state.authenticator(), hits.clone()),
            Some(&format!("Bearer {token}")),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("unauthorized_user"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cache_outage_is_a_500() {
        let (state, _users) = crate::testing::test_state_with_cache(Arc::new(
            crate::testing::UnavailableCache,
        ));
        let token = state.tokens.issue_access_token("a@x.com").unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let (status, body) = call(
            app(state.authenticator(), hits.clone()),
            Some(&format!("Bearer {token}")),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.contains("code"));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
