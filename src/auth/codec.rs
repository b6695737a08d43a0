// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token codec: HS256-signed, self-contained tokens.
//!
//! ## Format
//!
//! Standard compact JWS (`header.payload.signature`), header
//! `{"alg":"HS256","typ":"JWT"}`, payload `{sub, iat, exp, jti}` where `sub` is
//! the member's identity (email) and `jti` a random id that keeps two tokens
//! issued in the same second distinct.
//!
//! ## Decoding
//!
//! The header is inspected before signature verification so an unexpected
//! algorithm is reported as such rather than as a generic failure. Expiry is
//! checked here, not by `jsonwebtoken`, with no leeway: `exp <= now` is
//! expired.

use std::time::Duration;

use base64ct::{Base64UrlUnpadded, Encoding};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The only accepted signing algorithm.
pub const ALGORITHM: Algorithm = Algorithm::HS256;

/// Header value of [`ALGORITHM`].
const ALGORITHM_NAME: &str = "HS256";

/// Minimum secret length for HS256 (256 bits).
pub const MIN_SECRET_LEN: usize = 32;

/// Symmetric signing secret. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret(***)")
    }
}

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Member identity (email)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds)
    pub exp: i64,
    /// Unique token id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl TokenClaims {
    /// Claims for `identity` issued now and valid for `ttl`.
    ///
    /// A `ttl` beyond the `i64` range saturates instead of wrapping.
    pub fn new(identity: Option<&str>, ttl: Duration) -> Self {
        let now = Utc::now().timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sub: identity.map(str::to_string),
            iat: now,
            exp: now.saturating_add(ttl_secs),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }

    /// The identity claim, if present and not blank.
    pub fn identity(&self) -> Option<&str> {
        self.sub.as_deref().filter(|sub| !sub.trim().is_empty())
    }
}

/// Why a token failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("token is empty")]
    Empty,
    #[error("token is malformed")]
    Malformed,
    #[error("token algorithm is not supported")]
    UnsupportedAlgorithm,
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is invalid: {0}")]
    Invalid(String),
}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => DecodeError::Malformed,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                DecodeError::UnsupportedAlgorithm
            }
            ErrorKind::InvalidSignature => DecodeError::InvalidSignature,
            ErrorKind::ExpiredSignature => DecodeError::Expired,
            _ => DecodeError::Invalid(e.to_string()),
        }
    }
}

/// Just enough of the JOSE header to check the algorithm.
#[derive(Deserialize)]
struct RawHeader {
    #[serde(default)]
    alg: Option<String>,
}

/// Stateless token encoder/decoder.
#[derive(Clone)]
pub struct TokenCodec {
    validation: Validation,
}

impl TokenCodec {
    pub fn new() -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        Self { validation }
    }

    /// Sign claims for `identity` that expire `ttl` from now.
    pub fn encode(
        &self,
        identity: Option<&str>,
        secret: &SigningSecret,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.encode_claims(&TokenClaims::new(identity, ttl), secret)
    }

    /// Sign exactly the given claims.
    pub fn encode_claims(
        &self,
        claims: &TokenClaims,
        secret: &SigningSecret,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(
            &Header::new(ALGORITHM),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify signature and expiry, returning the claims.
    pub fn decode(&self, token: &str, secret: &SigningSecret) -> Result<TokenClaims, DecodeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DecodeError::Empty);
        }
        check_header(token)?;

        let data = jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &self.validation,
        )?;

        if data.claims.exp <= Utc::now().timestamp() {
            return Err(DecodeError::Expired);
        }
        Ok(data.claims)
    }
}

impl Default for TokenCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn check_header(token: &str) -> Result<(), DecodeError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(DecodeError::Malformed);
    };

    let bytes = Base64UrlUnpadded::decode_vec(header).map_err(|_| DecodeError::Malformed)?;
    let header: RawHeader = serde_json::from_slice(&bytes).map_err(|_| DecodeError::Malformed)?;
    match header.alg.as_deref() {
        Some(ALGORITHM_NAME) => Ok(()),
        _ => Err(DecodeError::UnsupportedAlgorithm),
    }
}
