// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session lifecycle endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::auth::{AccessBearer, AuthError, RefreshBearer};
use crate::error::ApiError;
use crate::models::{LoginRequest, MessageResponse, TokenResponse};
use crate::state::AppState;

/// Log in with email and password.
///
/// Issues a new access/refresh pair. Any refresh token issued earlier for the
/// same member stops working.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Unknown member or wrong password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = payload?;
    let issued = state
        .sessions
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(issued.into()))
}

/// Log out: revoke the member's refresh token.
///
/// The access token itself stays valid until it expires.
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Missing or invalid token, or not logged in"),
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    AccessBearer(token): AccessBearer,
) -> Result<Json<MessageResponse>, AuthError> {
    state.sessions.logout(&token).await?;
    Ok(Json(MessageResponse::new("Logged out")))
}

/// Exchange the current refresh token for a new pair.
#[utoipa::path(
    post,
    path = "/auth/token/reissue",
    tag = "Auth",
    security(("refresh" = [])),
    responses(
        (status = 200, description = "New token pair issued", body = TokenResponse),
        (status = 401, description = "Refresh token missing, invalid, expired or superseded"),
    )
)]
pub async fn reissue(
    State(state): State<AppState>,
    RefreshBearer(token): RefreshBearer,
) -> Result<Json<TokenResponse>, AuthError> {
    let issued = state.sessions.reissue(&token).await?;
    Ok(Json(issued.into()))
}

/// Log out and delete the member.
#[utoipa::path(
    post,
    path = "/auth/withdrawal",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Member deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token, or not logged in"),
    )
)]
pub async fn withdrawal(
    State(state): State<AppState>,
    AccessBearer(token): AccessBearer,
) -> Result<Json<MessageResponse>, AuthError> {
    state.sessions.withdrawal(&token).await?;
    Ok(Json(MessageResponse::new("Member withdrawn")))
}
