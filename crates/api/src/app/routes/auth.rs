use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::Response,
    routing::{get, post},
    Json, Router,
};

use keystone_auth::{AuthError, Role};

use crate::app::dto::{IntrospectRequest, IntrospectResponse, MeResponse, MessageResponse, RefreshRequest};
use crate::app::errors::{auth_error_to_response, json_error, ok, validation_error};
use crate::app::services::AppServices;
use crate::authz::RequireRoles;
use crate::context::PrincipalContext;

pub fn public_router() -> Router {
    Router::new().route("/api/v1/auth/refresh", post(refresh))
}

pub fn router() -> Router {
    Router::new()
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/me", get(me))
        .route(
            "/api/v1/auth/introspect",
            post(introspect).require_roles([Role::Admin]),
        )
}

/// POST /api/v1/auth/refresh - rotate a refresh token into a new pair
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return validation_error(rejection.body_text()),
    };

    match services.tokens.refresh(&body.refresh_token) {
        Some(pair) => ok(pair),
        None => json_error(
            axum::http::StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Invalid refresh token",
        ),
    }
}

/// POST /api/v1/auth/logout - stateless; the client discards its tokens
pub async fn logout(Extension(principal): Extension<PrincipalContext>) -> Response {
    tracing::info!(sub = %principal.principal_id(), "logout");
    ok(MessageResponse {
        message: "Logged out successfully",
    })
}

/// GET /api/v1/auth/me - the authenticated principal
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    let known = services.directory.find(principal.principal_id());

    ok(MeResponse {
        id: principal.principal_id().to_string(),
        email: principal
            .email()
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .or_else(|| known.as_ref().and_then(|p| p.email.clone())),
        name: known.as_ref().and_then(|p| p.name.clone()),
        avatar_url: known.and_then(|p| p.avatar_url),
        roles: principal.roles().iter().copied().collect(),
    })
}

/// POST /api/v1/auth/introspect - decode any token issued by this service
pub async fn introspect(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<IntrospectRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return validation_error(rejection.body_text()),
    };

    match services.tokens.verify(&body.token) {
        Some(claims) => ok(IntrospectResponse {
            active: true,
            claims,
        }),
        None => auth_error_to_response(AuthError::Unauthenticated),
    }
}
