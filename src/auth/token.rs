// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token issuance and verification (HS256).
//!
//! Tokens are self-contained: nothing is persisted, and verification needs
//! only the process-wide secret handed to [`TokenKeys::from_secret`] at
//! startup. A token is valid iff its signature matches and `now < exp`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::AccessClaims;
use super::error::{AuthError, InvalidReason};

/// Fixed access token lifetime.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// A freshly signed token and the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: AccessClaims,
}

/// Signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys").finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Sign a token for the account, valid for 24 hours from now.
    pub fn issue(
        &self,
        account_id: &str,
        username: &str,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        self.issue_at(account_id, username, Utc::now())
    }

    /// Sign a token as if it had been issued at `issued_at`.
    pub fn issue_at(
        &self,
        account_id: &str,
        username: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let claims = AccessClaims {
            account_id: account_id.to_string(),
            username: username.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(IssuedToken { token, claims })
    }

    /// Verify signature and expiry, returning the carried claims.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data =
            decode::<AccessClaims>(token, &self.decoding, &validation).map_err(map_jwt_error)?;

        // jsonwebtoken accepts exp == now; the token is already dead then
        if token_data.claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::InvalidToken(InvalidReason::Expired));
        }

        Ok(token_data.claims)
    }
}

fn map_jwt_error(error: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    let reason = match error.kind() {
        ErrorKind::ExpiredSignature => InvalidReason::Expired,
        ErrorKind::InvalidSignature => InvalidReason::BadSignature,
        _ => InvalidReason::Malformed,
    };
    AuthError::InvalidToken(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    const SECRET: &[u8] = b"test-secret-key-that-is-long-enough";

    #[test]
    fn issued_token_verifies_and_expires_in_24_hours() {
        let keys = TokenKeys::from_secret(SECRET);
        let issued = keys.issue("acc-1", "alice").unwrap();

        assert_eq!(issued.claims.exp - issued.claims.iat, 24 * 3600);

        let claims = keys.verify(&issued.token).unwrap();
        assert_eq!(claims, issued.claims);
    }

    #[test]
    fn token_older_than_24_hours_is_rejected() {
        let keys = TokenKeys::from_secret(SECRET);
        let issued = keys
            .issue_at("acc-1", "alice", Utc::now() - Duration::hours(25))
            .unwrap();

        assert_eq!(
            keys.verify(&issued.token),
            Err(AuthError::InvalidToken(InvalidReason::Expired))
        );
    }

    #[test]
    fn token_at_exact_expiry_is_rejected() {
        let keys = TokenKeys::from_secret(SECRET);
        let issued = keys
            .issue_at("acc-1", "alice", Utc::now() - Duration::hours(TOKEN_LIFETIME_HOURS))
            .unwrap();

        assert_eq!(
            keys.verify(&issued.token),
            Err(AuthError::InvalidToken(InvalidReason::Expired))
        );
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issued = TokenKeys::from_secret(b"another-secret-entirely-different")
            .issue("acc-1", "alice")
            .unwrap();

        let keys = TokenKeys::from_secret(SECRET);
        assert_eq!(
            keys.verify(&issued.token),
            Err(AuthError::InvalidToken(InvalidReason::BadSignature))
        );
    }

    #[test]
    fn garbage_token_is_malformed() {
        let keys = TokenKeys::from_secret(SECRET);
        assert_eq!(
            keys.verify("not-a-valid-jwt"),
            Err(AuthError::InvalidToken(InvalidReason::Malformed))
        );
        assert_eq!(
            keys.verify(""),
            Err(AuthError::InvalidToken(InvalidReason::Malformed))
        );
    }

    #[test]
    fn token_missing_identity_claims_is_malformed() {
        #[derive(Serialize)]
        struct Partial {
            sub: String,
            exp: i64,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: "acc-1".to_string(),
                exp: (Utc::now() + Duration::hours(1)).timestamp(),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let keys = TokenKeys::from_secret(SECRET);
        assert_eq!(
            keys.verify(&token),
            Err(AuthError::InvalidToken(InvalidReason::Malformed))
        );
    }

    #[test]
    fn debug_does_not_print_key_material() {
        let keys = TokenKeys::from_secret(SECRET);
        assert_eq!(format!("{keys:?}"), "TokenKeys { .. }");
    }
}
