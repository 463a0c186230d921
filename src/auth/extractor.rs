// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access gate and the Axum extractor built on it.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use super::{AuthError, AuthenticatedUser, TokenKeys};
use crate::state::AppState;

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// An absent header, a non-Bearer scheme and an empty token all count as
/// "no token".
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AuthError::MissingToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Verify the request's bearer token and yield the caller's identity.
///
/// Stateless: only signature and expiry are checked, the account is not
/// looked up again.
pub fn authorize(headers: &HeaderMap, keys: &TokenKeys) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    let claims = keys.verify(token)?;
    Ok(AuthenticatedUser::from_claims(claims))
}

/// Extractor for authenticated users.
///
/// Reuses the identity stored by [`super::middleware::require_auth`] when the
/// route sits behind it, and runs the gate itself otherwise.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if middleware already set the user
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let user = authorize(&parts.headers, &state.tokens)?;
        Ok(Auth(user))
    }
}
