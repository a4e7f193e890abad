//! Route-level role requirements.
//!
//! Required roles are attached where a handler is registered:
//!
//! ```ignore
//! .route("/introspect", post(introspect).require_roles([Role::Admin]))
//! ```
//!
//! The gate only reads the [`PrincipalContext`] placed by the bearer
//! middleware, so it must sit inside the authenticated router.

use std::convert::Infallible;

use axum::{
    extract::State,
    middleware::{Next, from_fn_with_state},
    response::Response,
    routing::MethodRouter,
};

use keystone_auth::{AuthorizationGuard, Role, RoleSet};

use crate::app::errors::auth_error_to_response;
use crate::context::PrincipalContext;

/// Roles a route accepts (any one of them, hierarchy applied).
#[derive(Debug, Clone)]
pub struct RequiredRoles {
    roles: RoleSet,
    guard: AuthorizationGuard,
}

impl RequiredRoles {
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::with_guard(AuthorizationGuard::default(), roles)
    }

    pub fn with_guard(guard: AuthorizationGuard, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
            guard,
        }
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }
}

pub trait RequireRoles {
    /// Only let through principals holding (or implying) one of `roles`.
    fn require_roles(self, roles: impl IntoIterator<Item = Role>) -> Self;
}

impl<S> RequireRoles for MethodRouter<S, Infallible>
where
    S: Clone + Send + Sync + 'static,
{
    fn require_roles(self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.route_layer(from_fn_with_state(RequiredRoles::any_of(roles), enforce_roles))
    }
}

async fn enforce_roles(
    State(required): State<RequiredRoles>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let principal = req.extensions().get::<PrincipalContext>();

    if let Err(e) = required
        .guard
        .check(&required.roles, principal.map(PrincipalContext::roles))
    {
        tracing::debug!(
            principal = ?principal.map(|p| p.principal_id().as_str()),
            required = ?required.roles,
            error = %e,
            "route access denied"
        );
        return Err(auth_error_to_response(e));
    }

    Ok(next.run(req).await)
}
