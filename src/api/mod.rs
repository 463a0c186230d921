// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{middleware::require_auth, AuthenticatedUser},
    error::ApiError,
    models::{
        Credentials, LoginResponse, ProtectedResponse, SaveSettingsRequest, SettingsResponse,
        SignupResponse,
    },
    state::AppState,
    storage::{GeneralSettings, PastTrailSettings, SettingsDocument},
};

pub mod accounts;
pub mod health;
pub mod settings;

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/validateUser", post(accounts::validate_user))
        .route("/signup", post(accounts::signup))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    let protected_routes = Router::new()
        .route("/protected", get(accounts::protected))
        .route("/saveSettings", post(settings::save_settings))
        .route("/getSettings/{user_id}", get(settings::get_settings))
        .route_layer(from_fn_with_state(state.tokens.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Registers the `bearer` scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::validate_user,
        accounts::signup,
        accounts::protected,
        settings::save_settings,
        settings::get_settings,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Credentials,
            LoginResponse,
            SignupResponse,
            ProtectedResponse,
            AuthenticatedUser,
            SaveSettingsRequest,
            SettingsResponse,
            SettingsDocument,
            GeneralSettings,
            PastTrailSettings,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Accounts", description = "Signup, login and token checks"),
        (name = "Settings", description = "Per-account map settings"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
