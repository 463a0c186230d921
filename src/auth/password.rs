// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password digests.
//!
//! Each account gets a random 16-byte salt; the stored digest is
//! HMAC-SHA256 of the password keyed by that salt. Both are kept base64
//! encoded. Login still means "this exact password", it is just never
//! written to disk.

use base64ct::{Base64, Encoding};
use hmac::{digest::InvalidLength, Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Salt and digest as persisted on the account record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub salt: String,
    pub digest: String,
}

fn keyed_mac(salt: &[u8], password: &str) -> Result<HmacSha256, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(salt)?;
    mac.update(password.as_bytes());
    Ok(mac)
}

/// Derive a digest for a new password under a fresh random salt.
pub fn hash_password(password: &str) -> Result<PasswordDigest, InvalidLength> {
    let salt = *uuid::Uuid::new_v4().as_bytes();
    let digest = keyed_mac(&salt, password)?.finalize().into_bytes();

    Ok(PasswordDigest {
        salt: Base64::encode_string(&salt),
        digest: Base64::encode_string(&digest),
    })
}

/// Constant-time check of `password` against a stored salt and digest.
///
/// Undecodable stored values never match.
pub fn verify_password(password: &str, salt: &str, digest: &str) -> bool {
    let (Ok(salt), Ok(expected)) = (Base64::decode_vec(salt), Base64::decode_vec(digest)) else {
        tracing::warn!("Stored password digest is not valid base64");
        return false;
    };

    match keyed_mac(&salt, password) {
        Ok(mac) => mac.verify_slice(&expected).is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let stored = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &stored.salt, &stored.digest));
    }

    #[test]
    fn wrong_or_differently_cased_password_fails() {
        let stored = hash_password("hunter2").unwrap();
        assert!(!verify_password("hunter3", &stored.salt, &stored.digest));
        assert!(!verify_password("Hunter2", &stored.salt, &stored.digest));
        assert!(!verify_password("", &stored.salt, &stored.digest));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }

    #[test]
    fn digest_does_not_contain_password() {
        let stored = hash_password("plaintext-password").unwrap();
        assert!(!stored.digest.contains("plaintext-password"));
        assert!(!stored.salt.contains("plaintext-password"));
    }

    #[test]
    fn corrupt_stored_values_never_match() {
        let stored = hash_password("hunter2").unwrap();
        assert!(!verify_password("hunter2", "%%%", &stored.digest));
        assert!(!verify_password("hunter2", &stored.salt, "not base64!"));
    }
}
