//! `keystone-auth`: token lifecycle and role-hierarchy authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage. Every check it
//! performs is synchronous CPU work over immutable data.

pub mod authorize;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod config;
pub mod directory;
pub mod error;
pub mod hierarchy;
pub mod principal;
pub mod roles;
pub mod service;
pub mod ttl;

pub use authorize::{
    authorize, AuthorizationExplanation, AuthorizationGuard, Decision, DenialKind, DenialReason,
    RoleDefinition,
};
pub use claims::{validate_claims, ClaimSet, TokenClaims, TokenError, TokenKind};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{Hs256TokenCodec, TokenCodec};
pub use config::{AuthConfig, ConfigError, RefreshRolePolicy};
pub use directory::{InMemoryPrincipalDirectory, PrincipalDirectory};
pub use error::{AuthError, AuthResult};
pub use hierarchy::{HierarchyError, RoleHierarchy};
pub use principal::{Principal, PrincipalId};
pub use roles::{Role, RoleSet, UnknownRole};
pub use service::{TokenPair, TokenService};
pub use ttl::{parse_ttl, DEFAULT_TTL, MAX_TTL};
