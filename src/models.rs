// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Every response carries a
//! `success` flag and a human readable `message`; failures use the same
//! envelope (see [`crate::error::ApiError`]).
//!
//! Field names are camelCase on the wire (`userId`, `pastTrail`).

use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::storage::SettingsDocument;

/// JSON body extractor whose rejection is a 400 in the API's error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

// =============================================================================
// Account Models
// =============================================================================

/// Username/password pair for login and signup.
///
/// Both fields are optional on the wire so a missing field reports
/// "Username and password are required" rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }
}

/// Successful login: a signed access token valid for 24 hours.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub username: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
}

/// Identity decoded from the caller's token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProtectedResponse {
    pub success: bool,
    pub message: String,
    pub user: AuthenticatedUser,
}

// =============================================================================
// Settings Models
// =============================================================================

/// Settings save request.
///
/// `settings` is kept as raw JSON: its fields arrive as strings or numbers
/// and are coerced during validation.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSettingsRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub settings: Option<Value>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SettingsResponse {
    pub success: bool,
    pub message: String,
    pub settings: SettingsDocument,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn credentials_tolerate_missing_fields() {
        let creds: Credentials = serde_json::from_value(json!({ "username": "alice" })).unwrap();
        assert_eq!(creds.username(), "alice");
        assert_eq!(creds.password(), "");
    }

    #[test]
    fn save_request_reads_camel_case_user_id() {
        let req: SaveSettingsRequest = serde_json::from_value(json!({
            "userId": "abc",
            "settings": { "general": {} }
        }))
        .unwrap();
        assert_eq!(req.user_id.as_deref(), Some("abc"));
        assert!(req.settings.is_some());
    }

    #[test]
    fn login_response_uses_user_id_key() {
        let body = serde_json::to_value(LoginResponse {
            success: true,
            message: "ok".into(),
            token: "t".into(),
            username: "alice".into(),
            user_id: "id".into(),
        })
        .unwrap();
        assert_eq!(body["userId"], "id");
        assert!(body.get("user_id").is_none());
    }
}
