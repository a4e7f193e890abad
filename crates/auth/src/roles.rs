use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role identifier used for RBAC.
///
/// The role set is closed: anything outside this enum is rejected when parsed,
/// so an unknown role can never reach an authorization decision.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    OrganizationOwner,
    Admin,
    DepartmentManager,
    ProjectManager,
    ProjectMember,
}

/// Ordered set of roles. Ordering keeps token payloads deterministic.
pub type RoleSet = BTreeSet<Role>;

impl Role {
    pub const COUNT: usize = 5;

    /// Every role, most senior first.
    pub const ALL: [Role; Role::COUNT] = [
        Role::OrganizationOwner,
        Role::Admin,
        Role::DepartmentManager,
        Role::ProjectManager,
        Role::ProjectMember,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::OrganizationOwner => "ORGANIZATION_OWNER",
            Role::Admin => "ADMIN",
            Role::DepartmentManager => "DEPARTMENT_MANAGER",
            Role::ProjectManager => "PROJECT_MANAGER",
            Role::ProjectMember => "PROJECT_MEMBER",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
