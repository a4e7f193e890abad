//! RBAC audit endpoints.
//!
//! These answer "what does each role imply" and "why would this caller be
//! denied" without attempting the operation.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::Response,
    routing::get,
    Router,
};
use keystone_auth::{Role, RoleSet};

use crate::app::dto::{ExplainQuery, HierarchyResponse};
use crate::app::errors::{ok, validation_error};
use crate::app::services::AppServices;
use crate::authz::RequireRoles;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route(
            "/api/v1/rbac/hierarchy",
            get(hierarchy).require_roles([Role::ProjectMember]),
        )
        .route("/api/v1/rbac/explain", get(explain))
}

/// GET /api/v1/rbac/hierarchy - every role with the roles it implies
pub async fn hierarchy(Extension(services): Extension<Arc<AppServices>>) -> Response {
    ok(HierarchyResponse {
        roles: services.guard.role_definitions(),
    })
}

/// GET /api/v1/rbac/explain?role=ADMIN - would the caller pass a route requiring `role`
pub async fn explain(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(query): Query<ExplainQuery>,
) -> Response {
    let required = match parse_roles(&query.role) {
        Ok(required) => required,
        Err(message) => return validation_error(message),
    };

    ok(services.guard.explain(&required, Some(principal.roles())))
}

fn parse_roles(raw: &str) -> Result<RoleSet, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<Role>().map_err(|e| e.to_string()))
        .collect()
}
