// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Member Collaborators
//!
//! The auth subsystem never owns member records. It calls out to:
//!
//! - [`UserStore`] - authoritative identity → member lookups and deletion
//! - [`CredentialVerifier`] - password checks against the stored hash
//!
//! [`InMemoryUserStore`] and [`HmacCredentialVerifier`] are the bundled
//! implementations used for development and tests.

pub mod credentials;
pub mod memory;

use async_trait::async_trait;
use unicode_normalization::UnicodeNormalization;

use crate::auth::MemberId;

pub use credentials::HmacCredentialVerifier;
pub use memory::InMemoryUserStore;

/// Stored login material for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub member_id: MemberId,
    pub password_hash: String,
    pub salt: String,
}

/// Error type for user store operations.
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("member not found: {0}")]
    NotFound(String),
    #[error("member already exists: {0}")]
    AlreadyExists(String),
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// Authoritative member lookups.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Internal id of the member owning `identity`, if any.
    async fn find_internal_id_by_identity(
        &self,
        identity: &str,
    ) -> Result<Option<MemberId>, UserStoreError>;

    /// Login material for `identity`, if the member exists.
    async fn find_credentials(
        &self,
        identity: &str,
    ) -> Result<Option<StoredCredentials>, UserStoreError>;

    /// Delete the member owning `identity`.
    async fn delete_by_identity(&self, identity: &str) -> Result<(), UserStoreError>;
}

/// Password verification against a stored hash and salt.
pub trait CredentialVerifier: Send + Sync {
    fn matches(&self, plaintext: &str, stored_hash: &str, salt: &str) -> bool;
}

/// Canonical form of an identity: trimmed, NFKC-normalised, lowercased.
pub fn normalize_identity(raw: &str) -> String {
    raw.trim().nfkc().collect::<String>().to_lowercase()
}
