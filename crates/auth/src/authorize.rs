use std::sync::Arc;

use serde::Serialize;

use crate::{AuthError, AuthResult, Role, RoleHierarchy, RoleSet};

/// Outcome of an authorization check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        self == Decision::Allow
    }

    /// `Deny` becomes `Unauthenticated` when no principal was present and
    /// `Forbidden` otherwise.
    pub fn into_result(self, authenticated: bool) -> AuthResult<()> {
        match (self, authenticated) {
            (Decision::Allow, _) => Ok(()),
            (Decision::Deny, false) => Err(AuthError::Unauthenticated),
            (Decision::Deny, true) => Err(AuthError::Forbidden),
        }
    }
}

/// Per-request role gate.
///
/// - No IO
/// - No panics
/// - Never fetches roles itself: the caller passes the roles resolved when the
///   request was authenticated.
#[derive(Debug, Clone)]
pub struct AuthorizationGuard {
    hierarchy: Arc<RoleHierarchy>,
}

impl Default for AuthorizationGuard {
    fn default() -> Self {
        Self::new(RoleHierarchy::standard().clone())
    }
}

impl AuthorizationGuard {
    pub fn new(hierarchy: RoleHierarchy) -> Self {
        Self {
            hierarchy: Arc::new(hierarchy),
        }
    }

    pub fn hierarchy(&self) -> &RoleHierarchy {
        &self.hierarchy
    }

    /// An empty requirement always allows; an absent principal is denied;
    /// otherwise any satisfied required role allows.
    pub fn authorize(&self, required: &RoleSet, principal_roles: Option<&RoleSet>) -> Decision {
        decide(&self.hierarchy, required, principal_roles)
    }

    /// Like [`authorize`](Self::authorize) but maps a denial onto the outward
    /// taxonomy: no principal is `Unauthenticated`, a principal lacking a
    /// satisfying role is `Forbidden`.
    pub fn check(&self, required: &RoleSet, principal_roles: Option<&RoleSet>) -> AuthResult<()> {
        self.authorize(required, principal_roles)
            .into_result(principal_roles.is_some())
    }

    /// Explain why a decision was made (or would be made).
    pub fn explain(
        &self,
        required: &RoleSet,
        principal_roles: Option<&RoleSet>,
    ) -> AuthorizationExplanation {
        let decision = self.authorize(required, principal_roles);
        let held: Vec<Role> = principal_roles.into_iter().flatten().copied().collect();
        let effective: Vec<Role> = principal_roles
            .map(|roles| self.hierarchy.effective_roles(roles).into_iter().collect())
            .unwrap_or_default();

        let matched_role = principal_roles.and_then(|roles| {
            required
                .iter()
                .copied()
                .find(|r| self.hierarchy.satisfies(roles, *r))
        });

        let (reason, denial_reason) = match (decision, principal_roles, matched_role) {
            (Decision::Allow, _, None) => ("No roles are required".to_string(), None),
            (Decision::Allow, _, Some(role)) => (
                format!("Held roles imply required role {role}"),
                None,
            ),
            (Decision::Deny, None, _) => (
                "No authenticated principal".to_string(),
                Some(DenialReason {
                    kind: DenialKind::Unauthenticated,
                    message: "The request carries no authenticated principal".to_string(),
                    suggestions: vec!["Present a valid access token".to_string()],
                }),
            ),
            (Decision::Deny, Some(_), _) => (
                format!("None of the held roles {held:?} imply any of {required:?}"),
                Some(DenialReason {
                    kind: DenialKind::MissingRole,
                    message: format!("Missing one of the required roles: {required:?}"),
                    suggestions: self.suggestions(required),
                }),
            ),
        };

        AuthorizationExplanation {
            required_roles: required.iter().copied().collect(),
            decision,
            reason,
            held_roles: held,
            effective_roles: effective,
            matched_role,
            denial_reason,
        }
    }

    fn suggestions(&self, required: &RoleSet) -> Vec<String> {
        let mut granting: RoleSet = RoleSet::new();
        for role in required {
            granting.extend(self.hierarchy.satisfied_by(*role));
        }

        vec![format!(
            "Assign one of the following roles: {:?}",
            granting.into_iter().map(|r| r.as_str()).collect::<Vec<_>>()
        )]
    }

    /// Every role with the roles it implies (for audit/display).
    pub fn role_definitions(&self) -> Vec<RoleDefinition> {
        Role::ALL
            .into_iter()
            .map(|role| RoleDefinition {
                name: role,
                implies: self.hierarchy.implied_by(role).iter().copied().collect(),
                description: role_description(role),
            })
            .collect()
    }
}

/// Authorize against the standard platform hierarchy.
pub fn authorize(required: &RoleSet, principal_roles: Option<&RoleSet>) -> Decision {
    decide(RoleHierarchy::standard(), required, principal_roles)
}

fn decide(
    hierarchy: &RoleHierarchy,
    required: &RoleSet,
    principal_roles: Option<&RoleSet>,
) -> Decision {
    if required.is_empty() {
        return Decision::Allow;
    }

    match principal_roles {
        Some(held) if hierarchy.satisfies_any(held, required) => Decision::Allow,
        _ => Decision::Deny,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub required_roles: Vec<Role>,
    pub decision: Decision,

    /// Human-readable reason for the decision.
    pub reason: String,

    pub held_roles: Vec<Role>,

    /// Held roles plus everything they imply.
    pub effective_roles: Vec<Role>,

    /// The required role that was satisfied, if any.
    pub matched_role: Option<Role>,

    pub denial_reason: Option<DenialReason>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DenialReason {
    pub kind: DenialKind,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    Unauthenticated,
    MissingRole,
}

/// Role definition (for audit/display).
#[derive(Debug, Clone, Serialize)]
pub struct RoleDefinition {
    pub name: Role,
    pub implies: Vec<Role>,
    pub description: &'static str,
}

fn role_description(role: Role) -> &'static str {
    match role {
        Role::OrganizationOwner => "Owns the organization; implies every other role",
        Role::Admin => "Administers users, departments and projects",
        Role::DepartmentManager => "Manages the projects of a department",
        Role::ProjectManager => "Manages a project and its members",
        Role::ProjectMember => "Contributes to assigned projects",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(roles: &[Role]) -> RoleSet {
        roles.iter().copied().collect()
    }

    #[test]
    fn empty_requirement_allows_even_without_principal() {
        let guard = AuthorizationGuard::default();

        assert_eq!(guard.authorize(&RoleSet::new(), None), Decision::Allow);
        assert_eq!(guard.authorize(&RoleSet::new(), Some(&RoleSet::new())), Decision::Allow);
    }

    #[test]
    fn absent_principal_is_denied_as_unauthenticated() {
        let guard = AuthorizationGuard::default();
        let required = set(&[Role::ProjectMember]);

        assert_eq!(guard.authorize(&required, None), Decision::Deny);
        assert_eq!(guard.check(&required, None), Err(AuthError::Unauthenticated));
    }

    #[test]
    fn project_manager_reaches_member_routes_but_not_admin_routes() {
        let guard = AuthorizationGuard::default();
        let held = set(&[Role::ProjectManager]);

        assert_eq!(guard.authorize(&set(&[Role::ProjectMember]), Some(&held)), Decision::Allow);
        assert_eq!(guard.authorize(&set(&[Role::Admin]), Some(&held)), Decision::Deny);
        assert_eq!(guard.check(&set(&[Role::Admin]), Some(&held)), Err(AuthError::Forbidden));
    }

    #[test]
    fn exact_role_and_senior_roles_are_allowed() {
        let guard = AuthorizationGuard::default();
        let required = set(&[Role::Admin]);

        assert!(guard.authorize(&required, Some(&set(&[Role::Admin]))).is_allowed());
        assert!(guard.authorize(&required, Some(&set(&[Role::OrganizationOwner]))).is_allowed());
        assert!(!guard.authorize(&required, Some(&set(&[Role::DepartmentManager]))).is_allowed());
    }

    #[test]
    fn authenticated_principal_without_roles_is_forbidden() {
        let guard = AuthorizationGuard::default();
        assert_eq!(
            guard.check(&set(&[Role::ProjectMember]), Some(&RoleSet::new())),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn free_function_matches_the_default_guard() {
        let guard = AuthorizationGuard::default();
        for required in Role::ALL {
            for held in Role::ALL {
                let required = set(&[required]);
                let held = set(&[held]);
                assert_eq!(
                    authorize(&required, Some(&held)),
                    guard.authorize(&required, Some(&held))
                );
            }
        }
    }

    #[test]
    fn explanation_names_the_matching_role() {
        let guard = AuthorizationGuard::default();
        let explanation = guard.explain(
            &set(&[Role::Admin, Role::ProjectMember]),
            Some(&set(&[Role::ProjectManager])),
        );

        assert_eq!(explanation.decision, Decision::Allow);
        assert_eq!(explanation.matched_role, Some(Role::ProjectMember));
        assert_eq!(
            explanation.effective_roles,
            vec![Role::ProjectManager, Role::ProjectMember]
        );
        assert!(explanation.denial_reason.is_none());
    }

    #[test]
    fn denial_explanation_suggests_granting_roles() {
        let guard = AuthorizationGuard::default();
        let explanation =
            guard.explain(&set(&[Role::DepartmentManager]), Some(&set(&[Role::ProjectMember])));

        let denial = explanation.denial_reason.unwrap();
        assert_eq!(denial.kind, DenialKind::MissingRole);
        assert!(denial.suggestions[0].contains("ADMIN"));
        assert!(denial.suggestions[0].contains("DEPARTMENT_MANAGER"));
        assert!(!denial.suggestions[0].contains("PROJECT_MEMBER"));
    }

    #[test]
    fn decision_maps_onto_auth_errors() {
        assert_eq!(Decision::Allow.into_result(false), Ok(()));
        assert_eq!(Decision::Deny.into_result(false), Err(AuthError::Unauthenticated));
        assert_eq!(Decision::Deny.into_result(true), Err(AuthError::Forbidden));
    }

    #[test]
    fn role_definitions_cover_every_role() {
        let defs = AuthorizationGuard::default().role_definitions();
        assert_eq!(defs.len(), Role::COUNT);
        assert_eq!(defs[0].name, Role::OrganizationOwner);
        assert_eq!(defs[0].implies.len(), Role::COUNT);
    }

    proptest! {
        #[test]
        fn empty_requirement_always_allows(
            held in prop::option::of(prop::collection::btree_set(
                prop::sample::select(Role::ALL.to_vec()), 0..5
            )),
        ) {
            let guard = AuthorizationGuard::default();
            prop_assert_eq!(guard.authorize(&RoleSet::new(), held.as_ref()), Decision::Allow);
        }

        #[test]
        fn non_empty_requirement_without_principal_always_denies(
            required in prop::collection::btree_set(
                prop::sample::select(Role::ALL.to_vec()), 1..5
            ),
        ) {
            let guard = AuthorizationGuard::default();
            prop_assert_eq!(guard.authorize(&required, None), Decision::Deny);
        }
    }
}
