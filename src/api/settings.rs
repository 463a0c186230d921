// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Settings endpoints.
//!
//! Both routes sit behind the access gate. The `userId` they address is taken
//! from the request, not from the token.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::ApiError;
use crate::models::{JsonBody, SaveSettingsRequest, SettingsResponse};
use crate::state::AppState;

/// Validate and store the caller's map settings, replacing any previous ones.
#[utoipa::path(
    post,
    path = "/saveSettings",
    tag = "Settings",
    security(("bearer" = [])),
    request_body = SaveSettingsRequest,
    responses(
        (status = 200, description = "Settings saved", body = SettingsResponse),
        (status = 400, description = "Missing, malformed or out of range settings"),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn save_settings(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SaveSettingsRequest>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = state
        .settings
        .save_settings(request.user_id.as_deref(), request.settings.as_ref())
        .await?;

    Ok(Json(SettingsResponse {
        success: true,
        message: "Settings saved successfully".to_string(),
        settings,
    }))
}

#[utoipa::path(
    get,
    path = "/getSettings/{user_id}",
    tag = "Settings",
    security(("bearer" = [])),
    params(
        ("user_id" = String, Path, description = "Account id (UUID)")
    ),
    responses(
        (status = 200, description = "Stored settings", body = SettingsResponse),
        (status = 400, description = "Invalid account id"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Settings not found for this user"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_settings(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<SettingsResponse>, ApiError> {
    let settings = state.settings.get_settings(&user_id).await?;

    Ok(Json(SettingsResponse {
        success: true,
        message: "Settings retrieved successfully".to_string(),
        settings,
    }))
}
