// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Token lifecycle and per-request identity resolution.
//!
//! ## Auth Flow
//!
//! 1. `POST /auth/login` verifies credentials and issues an access/refresh pair.
//!    The refresh token is stored in the TTL cache under the member's identity.
//! 2. Clients send `Authorization: Bearer <access token>` on every request.
//! 3. The [`authenticate`] middleware:
//!    - Treats a missing credential as anonymous
//!    - Verifies signature (HS256) and expiry of the access token
//!    - Resolves identity → member id through the session cache, falling back
//!      to the user store
//!    - Installs an [`AuthContext`] in the request extensions
//! 4. `POST /auth/token/reissue` rotates the pair using
//!    `Authorization-Refresh: Bearer <refresh token>`.
//!
//! ## Security
//!
//! - Access and refresh tokens use distinct secrets
//! - Only the most recently issued refresh token per member is accepted
//! - Logout and withdrawal revoke the refresh token; access tokens stay valid
//!   until they expire
//! - Tokens and secrets are never logged

pub mod codec;
pub mod context;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod resolver;
pub mod session;
pub mod tokens;

pub use codec::SigningSecret;
pub use context::{AuthContext, MemberId, ANONYMOUS_MEMBER_ID};
pub use error::AuthError;
pub use extractor::{AccessBearer, Auth, CurrentContext, RefreshBearer};
pub use middleware::{authenticate, Authenticator};
pub use resolver::IdentityResolver;
pub use session::{IssuedTokens, SessionService};
pub use tokens::TokenService;
