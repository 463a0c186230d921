// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account endpoints: login, signup and the protected identity probe.

use axum::{extract::State, Json};

use crate::auth::Auth;
use crate::error::ApiError;
use crate::models::{Credentials, JsonBody, LoginResponse, ProtectedResponse, SignupResponse};
use crate::state::AppState;

/// Validate a username/password pair and issue an access token.
#[utoipa::path(
    post,
    path = "/validateUser",
    tag = "Accounts",
    request_body = Credentials,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Username or password missing"),
        (status = 401, description = "Invalid username or password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn validate_user(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<LoginResponse>, ApiError> {
    let grant = state
        .credentials
        .validate_credentials(credentials.username(), credentials.password())
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        message: "User validated successfully".to_string(),
        token: grant.token,
        username: grant.username,
        user_id: grant.account_id,
    }))
}

/// Register a new account. Log in separately to obtain a token.
#[utoipa::path(
    post,
    path = "/signup",
    tag = "Accounts",
    request_body = Credentials,
    responses(
        (status = 200, description = "Account registered", body = SignupResponse),
        (status = 400, description = "Missing fields or username already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<Credentials>,
) -> Result<Json<SignupResponse>, ApiError> {
    state
        .credentials
        .register_account(credentials.username(), credentials.password())
        .await?;

    Ok(Json(SignupResponse {
        success: true,
        message: "User registered successfully".to_string(),
    }))
}

/// Echo the identity carried by the caller's token.
#[utoipa::path(
    get,
    path = "/protected",
    tag = "Accounts",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Token accepted", body = ProtectedResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn protected(Auth(user): Auth) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        success: true,
        message: "Protected data".to_string(),
        user,
    })
}
