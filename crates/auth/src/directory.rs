//! Port through which current principal data is looked up.
//!
//! Storage lives outside this crate; implementations adapt whatever user/role
//! store the platform uses.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::{Principal, PrincipalId, RoleSet};

pub trait PrincipalDirectory: Send + Sync {
    fn find(&self, id: &PrincipalId) -> Option<Principal>;

    /// Current roles of `id`, or `None` when the principal is unknown.
    fn current_roles(&self, id: &PrincipalId) -> Option<RoleSet> {
        self.find(id).map(|p| p.roles)
    }

    /// Record a principal the identity collaborator just resolved at login.
    ///
    /// Stores that own their data (a database of users) ignore this.
    fn remember(&self, _principal: &Principal) {}
}

/// Map-backed directory (dev/test).
#[derive(Debug, Default)]
pub struct InMemoryPrincipalDirectory {
    inner: RwLock<HashMap<PrincipalId, Principal>>,
}

impl InMemoryPrincipalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a principal.
    pub fn upsert(&self, principal: Principal) {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(principal.id.clone(), principal);
    }

    pub fn remove(&self, id: &PrincipalId) -> Option<Principal> {
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
    }

    /// Replace the role set of a known principal. Returns false if unknown.
    pub fn set_roles(&self, id: &PrincipalId, roles: RoleSet) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match inner.get_mut(id) {
            Some(principal) => {
                principal.roles = roles;
                true
            }
            None => false,
        }
    }
}

impl PrincipalDirectory for InMemoryPrincipalDirectory {
    fn find(&self, id: &PrincipalId) -> Option<Principal> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    fn remember(&self, principal: &Principal) {
        self.upsert(principal.clone());
    }
}
