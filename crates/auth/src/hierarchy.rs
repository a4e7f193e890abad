//! Role hierarchy: a static implication relation with a precomputed closure.
//!
//! The relation is modelled as a directed graph (`senior -> junior`). The
//! reflexive-transitive closure is computed once at construction, after which
//! every satisfaction check is a set-membership test.

use std::sync::LazyLock;

use thiserror::Error;

use crate::{Role, RoleSet};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("role hierarchy contains a cycle through {0}")]
    Cycle(Role),
}

/// Closed implication table: `closure[r]` is every role that `r` satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHierarchy {
    closure: [RoleSet; Role::COUNT],
}

static STANDARD: LazyLock<RoleHierarchy> = LazyLock::new(|| {
    // The fixed chain is acyclic, so the closure always builds.
    RoleHierarchy::from_edges(Role::ALL.windows(2).map(|pair| (pair[0], pair[1])))
        .unwrap_or_else(|_| RoleHierarchy::flat())
});

impl RoleHierarchy {
    /// The platform hierarchy:
    /// `ORGANIZATION_OWNER ⊇ ADMIN ⊇ DEPARTMENT_MANAGER ⊇ PROJECT_MANAGER ⊇ PROJECT_MEMBER`.
    pub fn standard() -> &'static RoleHierarchy {
        &STANDARD
    }

    /// Build a hierarchy from `(senior, junior)` edges.
    ///
    /// Self-edges are redundant (every role satisfies itself) and ignored.
    pub fn from_edges(
        edges: impl IntoIterator<Item = (Role, Role)>,
    ) -> Result<Self, HierarchyError> {
        let mut juniors: [Vec<Role>; Role::COUNT] = Default::default();
        for (senior, junior) in edges {
            if senior != junior {
                juniors[index(senior)].push(junior);
            }
        }

        let mut closure: [RoleSet; Role::COUNT] = Default::default();
        for role in Role::ALL {
            let mut reached = RoleSet::new();
            let mut stack = juniors[index(role)].clone();

            while let Some(next) = stack.pop() {
                if next == role {
                    return Err(HierarchyError::Cycle(role));
                }
                if reached.insert(next) {
                    stack.extend(juniors[index(next)].iter().copied());
                }
            }

            reached.insert(role);
            closure[index(role)] = reached;
        }

        Ok(Self { closure })
    }

    /// Hierarchy with no implications: every role satisfies only itself.
    pub fn flat() -> Self {
        let mut closure: [RoleSet; Role::COUNT] = Default::default();
        for role in Role::ALL {
            closure[index(role)].insert(role);
        }
        Self { closure }
    }

    /// Roles implied by `role`, itself included.
    pub fn implied_by(&self, role: Role) -> &RoleSet {
        &self.closure[index(role)]
    }

    /// True iff `required` is implied by any held role.
    pub fn satisfies(&self, held: &RoleSet, required: Role) -> bool {
        held.iter()
            .any(|role| self.implied_by(*role).contains(&required))
    }

    /// True iff `required` is empty or at least one of its roles is satisfied.
    pub fn satisfies_any(&self, held: &RoleSet, required: &RoleSet) -> bool {
        required.is_empty() || required.iter().any(|r| self.satisfies(held, *r))
    }

    /// Union of the closures of every held role.
    pub fn effective_roles(&self, held: &RoleSet) -> RoleSet {
        held.iter()
            .flat_map(|role| self.implied_by(*role).iter().copied())
            .collect()
    }

    /// Roles that would satisfy `required` if held.
    pub fn satisfied_by(&self, required: Role) -> RoleSet {
        Role::ALL
            .into_iter()
            .filter(|role| self.implied_by(*role).contains(&required))
            .collect()
    }
}

fn index(role: Role) -> usize {
    role as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(roles: &[Role]) -> RoleSet {
        roles.iter().copied().collect()
    }

    fn any_role() -> impl Strategy<Value = Role> {
        prop::sample::select(Role::ALL.to_vec())
    }

    #[test]
    fn standard_closure_matches_the_fixed_chain() {
        let h = RoleHierarchy::standard();

        assert_eq!(h.implied_by(Role::OrganizationOwner).len(), 5);
        assert_eq!(
            h.implied_by(Role::DepartmentManager),
            &set(&[Role::DepartmentManager, Role::ProjectManager, Role::ProjectMember])
        );
        assert_eq!(h.implied_by(Role::ProjectMember), &set(&[Role::ProjectMember]));
    }

    #[test]
    fn admin_satisfies_department_manager_but_not_vice_versa() {
        let h = RoleHierarchy::standard();

        assert!(h.satisfies(&set(&[Role::Admin]), Role::DepartmentManager));
        assert!(!h.satisfies(&set(&[Role::DepartmentManager]), Role::Admin));
    }

    #[test]
    fn seniority_is_asymmetric_for_every_ordered_pair() {
        let h = RoleHierarchy::standard();

        for (i, senior) in Role::ALL.iter().enumerate() {
            for junior in &Role::ALL[i + 1..] {
                assert!(h.satisfies(&set(&[*senior]), *junior), "{senior} should satisfy {junior}");
                assert!(!h.satisfies(&set(&[*junior]), *senior), "{junior} must not satisfy {senior}");
            }
        }
    }

    #[test]
    fn empty_held_set_satisfies_nothing() {
        let h = RoleHierarchy::standard();
        for role in Role::ALL {
            assert!(!h.satisfies(&RoleSet::new(), role));
        }
    }

    #[test]
    fn satisfies_any_uses_or_semantics() {
        let h = RoleHierarchy::standard();
        let held = set(&[Role::ProjectManager]);

        assert!(h.satisfies_any(&held, &set(&[Role::Admin, Role::ProjectMember])));
        assert!(!h.satisfies_any(&held, &set(&[Role::Admin, Role::DepartmentManager])));
        assert!(h.satisfies_any(&RoleSet::new(), &RoleSet::new()));
    }

    #[test]
    fn from_edges_rejects_cycles() {
        let err = RoleHierarchy::from_edges([
            (Role::Admin, Role::ProjectMember),
            (Role::ProjectMember, Role::Admin),
        ])
        .unwrap_err();

        assert!(matches!(err, HierarchyError::Cycle(_)));
    }

    #[test]
    fn from_edges_supports_non_total_orders() {
        // Two independent branches under the owner.
        let h = RoleHierarchy::from_edges([
            (Role::OrganizationOwner, Role::Admin),
            (Role::OrganizationOwner, Role::DepartmentManager),
            (Role::DepartmentManager, Role::ProjectMember),
        ])
        .unwrap();

        assert!(h.satisfies(&set(&[Role::OrganizationOwner]), Role::ProjectMember));
        assert!(!h.satisfies(&set(&[Role::Admin]), Role::DepartmentManager));
        assert!(!h.satisfies(&set(&[Role::Admin]), Role::ProjectMember));
    }

    #[test]
    fn effective_roles_and_satisfied_by_are_inverse_views() {
        let h = RoleHierarchy::standard();

        assert_eq!(
            h.effective_roles(&set(&[Role::ProjectManager])),
            set(&[Role::ProjectManager, Role::ProjectMember])
        );
        assert_eq!(
            h.satisfied_by(Role::DepartmentManager),
            set(&[Role::OrganizationOwner, Role::Admin, Role::DepartmentManager])
        );
    }

    proptest! {
        #[test]
        fn every_role_satisfies_itself(role in any_role()) {
            prop_assert!(RoleHierarchy::standard().satisfies(&set(&[role]), role));
        }

        /// Adding roles to the held set never revokes a satisfied requirement.
        #[test]
        fn satisfaction_is_monotonic_in_held_roles(
            held in prop::collection::btree_set(any_role(), 0..5),
            extra in any_role(),
            required in any_role(),
        ) {
            let h = RoleHierarchy::standard();
            let mut grown = held.clone();
            grown.insert(extra);

            if h.satisfies(&held, required) {
                prop_assert!(h.satisfies(&grown, required));
            }
        }

        #[test]
        fn closure_lookup_agrees_with_effective_roles(
            held in prop::collection::btree_set(any_role(), 0..5),
            required in any_role(),
        ) {
            let h = RoleHierarchy::standard();
            prop_assert_eq!(
                h.satisfies(&held, required),
                h.effective_roles(&held).contains(&required)
            );
        }
    }
}
