// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{authenticate, extractor::REFRESH_AUTHORIZATION},
    models::{
        LoginRequest, MemberResponse, MessageResponse, SessionResponse, TokenResponse,
    },
    state::AppState,
    telemetry,
};

pub mod auth;
pub mod health;
pub mod members;

/// Build the HTTP router.
///
/// Login, reissue and health probes skip the authentication middleware so an
/// expired access token cannot lock a client out of getting a new one.
pub fn router(state: AppState) -> Router {
    let authenticated = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/withdrawal", post(auth::withdrawal))
        .route("/members/me", get(members::me))
        .route("/session", get(members::session))
        .route_layer(middleware::from_fn_with_state(
            state.authenticator(),
            authenticate,
        ));

    let open = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/token/reissue", post(auth::reissue))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .merge(authenticated)
        .merge(open)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(telemetry::make_span))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(CatchPanicLayer::new())
                .layer(CorsLayer::permissive()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::logout,
        auth::reissue,
        auth::withdrawal,
        members::me,
        members::session,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            TokenResponse,
            MessageResponse,
            MemberResponse,
            SessionResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, logout, token reissue and withdrawal"),
        (name = "Members", description = "Identity of the calling member"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        components.add_security_scheme(
            "refresh",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                REFRESH_AUTHORIZATION,
                "Bearer <refresh token>",
            ))),
        );
    }
}
