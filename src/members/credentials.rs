// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Salted password hashing.
//!
//! Hash = base64(HMAC-SHA256(key = salt, message = password)).
//! Verification recomputes the MAC and compares in constant time.

use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

use super::CredentialVerifier;

type HmacSha256 = Hmac<Sha256>;

/// Fresh random salt for a new credential.
pub fn generate_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Hash `plaintext` with `salt`.
pub fn hash_password(plaintext: &str, salt: &str) -> String {
    let mut mac = new_mac(salt);
    mac.update(plaintext.as_bytes());
    Base64::encode_string(&mac.finalize().into_bytes())
}

fn new_mac(salt: &str) -> HmacSha256 {
    // HMAC accepts keys of any length, including empty.
    <HmacSha256 as Mac>::new_from_slice(salt.as_bytes()).expect("HMAC accepts any key length")
}

/// [`CredentialVerifier`] for hashes produced by [`hash_password`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacCredentialVerifier;

impl CredentialVerifier for HmacCredentialVerifier {
    fn matches(&self, plaintext: &str, stored_hash: &str, salt: &str) -> bool {
        let Ok(expected) = Base64::decode_vec(stored_hash) else {
            return false;
        };
        let mut mac = new_mac(salt);
        mac.update(plaintext.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}
