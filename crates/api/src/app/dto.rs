use serde::{Deserialize, Serialize};

use keystone_auth::{Role, RoleDefinition, TokenClaims};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct IntrospectRequest {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
    pub roles: Vec<Role>,
}

#[derive(Debug, Serialize)]
pub struct IntrospectResponse {
    pub active: bool,
    pub claims: TokenClaims,
}

#[derive(Debug, Serialize)]
pub struct HierarchyResponse {
    pub roles: Vec<RoleDefinition>,
}

/// `?role=ADMIN` or `?role=ADMIN,PROJECT_MANAGER`.
#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub role: String,
}
