// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied as a route layer over every protected route, so a request never
//! reaches a protected handler without a verified identity in its
//! extensions. Handlers read that identity through the `Auth` extractor.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         token_keys.clone(),
//!         require_auth,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{extractor::authorize, TokenKeys};

/// Authentication middleware function.
pub async fn require_auth(
    State(keys): State<TokenKeys>,
    mut request: Request,
    next: Next,
) -> Response {
    match authorize(request.headers(), &keys) {
        Ok(user) => {
            // Add authenticated user to request extensions
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                path = %request.uri().path(),
                error_code = e.error_code(),
                "Rejected unauthenticated request"
            );
            e.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    const SECRET: &[u8] = b"middleware-test-secret";

    fn gated_router(keys: TokenKeys) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|Extension(user): Extension<AuthenticatedUser>| async move { user.username }),
            )
            .route_layer(axum::middleware::from_fn_with_state(keys, require_auth))
    }

    #[tokio::test]
    async fn passes_identity_to_handler() {
        let keys = TokenKeys::from_secret(SECRET);
        let token = keys.issue("acc-1", "judy").unwrap().token;

        let response = gated_router(keys)
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("Authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"judy");
    }

    #[tokio::test]
    async fn rejects_request_without_token() {
        let response = gated_router(TokenKeys::from_secret(SECRET))
            .oneshot(Request::builder().uri("/whoami").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
