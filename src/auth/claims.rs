// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by an access token.
///
/// Field names on the wire (`userId`, `username`, `iat`, `exp`) are what the
/// map client decodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Account identifier
    #[serde(rename = "userId")]
    pub account_id: String,

    /// Username at issuance time
    pub username: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,
}

/// Identity yielded by the access gate.
///
/// This is the type handlers receive for the caller of a protected route.
/// The account is not re-read from the store: a token stays good until
/// `exp` even if its account disappears.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Account identifier
    #[serde(rename = "userId")]
    pub account_id: String,

    pub username: String,

    /// Token issue time (Unix seconds)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Token expiry (Unix seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Create from verified token claims.
    pub fn from_claims(claims: AccessClaims) -> Self {
        Self {
            account_id: claims.account_id,
            username: claims.username,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }
}
