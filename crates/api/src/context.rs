use keystone_auth::{PrincipalId, RoleSet, TokenClaims};

/// Principal context for a request (authenticated identity + roles).
///
/// Built once by the bearer middleware from a verified access token. Route
/// guards and handlers read roles from here and never re-query storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal_id: PrincipalId,
    email: Option<String>,
    roles: RoleSet,
}

impl PrincipalContext {
    pub fn new(principal_id: PrincipalId, email: Option<String>, roles: RoleSet) -> Self {
        Self {
            principal_id,
            email,
            roles,
        }
    }

    pub fn principal_id(&self) -> &PrincipalId {
        &self.principal_id
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }
}

impl From<TokenClaims> for PrincipalContext {
    fn from(claims: TokenClaims) -> Self {
        Self::new(claims.sub, claims.email, claims.roles)
    }
}
