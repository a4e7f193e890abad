//! HTTP API: server wiring, bearer authentication and role-gated routes.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
