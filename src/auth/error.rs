// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access gate rejections.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a presented token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// `exp` is in the past
    Expired,
    /// Signed with a different secret
    BadSignature,
    /// Not a JWT, wrong algorithm, or missing claims
    Malformed,
}

/// Access gate rejection.
///
/// Both variants answer 401; the reason is only exposed as `error_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No usable `Authorization: Bearer <token>` header
    MissingToken,
    /// Token present but failed verification
    InvalidToken(InvalidReason),
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    message: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidToken(InvalidReason::Expired) => "token_expired",
            AuthError::InvalidToken(InvalidReason::BadSignature) => "invalid_signature",
            AuthError::InvalidToken(InvalidReason::Malformed) => "malformed_token",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "No token provided"),
            AuthError::InvalidToken(_) => write!(f, "Invalid token"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            message: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
