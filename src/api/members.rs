// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member identity endpoints.

use axum::Json;

use crate::auth::{Auth, CurrentContext};
use crate::models::{MemberResponse, SessionResponse};

/// Get the signed-in member.
#[utoipa::path(
    get,
    path = "/members/me",
    tag = "Members",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Member information", body = MemberResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn me(Auth(ctx): Auth) -> Json<MemberResponse> {
    Json(MemberResponse {
        member_id: ctx.member_id,
    })
}

/// Describe the identity attached to this request.
///
/// Never fails for a missing credential; anonymous callers get
/// `member_id = -1`.
#[utoipa::path(
    get,
    path = "/session",
    tag = "Members",
    responses(
        (status = 200, description = "Current request identity", body = SessionResponse),
        (status = 401, description = "A credential was sent but is invalid"),
    )
)]
pub async fn session(CurrentContext(ctx): CurrentContext) -> Json<SessionResponse> {
    Json(ctx.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthContext;

    #[tokio::test]
    async fn me_returns_member_id() {
        let Json(body) = me(Auth(AuthContext::authenticated(42))).await;
        assert_eq!(body.member_id, 42);
    }

    #[tokio::test]
    async fn session_reports_anonymous() {
        let Json(body) = session(CurrentContext(AuthContext::anonymous())).await;
        assert!(body.anonymous);
    }
}
