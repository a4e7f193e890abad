use axum::Router;

pub mod auth;
pub mod rbac;
pub mod system;

/// Routes reachable without a bearer token.
pub fn public_router() -> Router {
    auth::public_router()
}

/// Routes behind the bearer middleware.
pub fn protected_router() -> Router {
    Router::new().merge(auth::router()).merge(rbac::router())
}
