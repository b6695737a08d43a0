// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped authentication context.

/// Internal numeric member id.
pub type MemberId = i64;

/// Member id carried by requests without a credential.
pub const ANONYMOUS_MEMBER_ID: MemberId = -1;

/// Who is making the current request.
///
/// Built fresh by the authentication middleware for every request and stored
/// in the request extensions; handlers read it through the extractors in
/// [`super::extractor`]. Nothing outlives the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Resolved member id, or [`ANONYMOUS_MEMBER_ID`]
    pub member_id: MemberId,
    /// Granted capabilities (always empty for now)
    pub authorities: Vec<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self {
            member_id: ANONYMOUS_MEMBER_ID,
            authorities: Vec::new(),
        }
    }

    pub fn authenticated(member_id: MemberId) -> Self {
        Self {
            member_id,
            authorities: Vec::new(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.member_id == ANONYMOUS_MEMBER_ID
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
