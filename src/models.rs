// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for the OpenAPI document.
//!
//! Tokens only ever travel in these bodies and in request headers. Nothing
//! here implements `Display`, so they do not end up in log lines by accident.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{AuthContext, IssuedTokens, MemberId};

// =============================================================================
// Auth Models
// =============================================================================

/// Credentials for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Login identity (email). Normalised before lookup.
    pub email: String,
    pub password: String,
}

/// A freshly issued token pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    /// Internal id of the member the tokens belong to.
    #[schema(value_type = i64)]
    pub member_id: MemberId,
    /// Short-lived token for `Authorization: Bearer`.
    pub access_token: String,
    /// Long-lived token for `Authorization-Refresh: Bearer`.
    pub refresh_token: String,
}

impl From<IssuedTokens> for TokenResponse {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            member_id: tokens.member_id,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Member Models
// =============================================================================

/// The signed-in member.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MemberResponse {
    #[schema(value_type = i64)]
    pub member_id: MemberId,
}

/// Identity attached to the current request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SessionResponse {
    /// Member id, or `-1` for anonymous requests.
    #[schema(value_type = i64)]
    pub member_id: MemberId,
    pub anonymous: bool,
    pub authorities: Vec<String>,
}

impl From<AuthContext> for SessionResponse {
    fn from(ctx: AuthContext) -> Self {
        Self {
            anonymous: ctx.is_anonymous(),
            member_id: ctx.member_id,
            authorities: ctx.authorities,
        }
    }
}
