use std::sync::Arc;

use keystone_auth::{
    AuthConfig, AuthorizationGuard, InMemoryPrincipalDirectory, Principal, PrincipalDirectory,
    TokenError, TokenPair, TokenService,
};

/// Everything handlers share, installed once as a request extension.
#[derive(Clone)]
pub struct AppServices {
    pub tokens: Arc<TokenService>,
    pub directory: Arc<dyn PrincipalDirectory>,
    pub guard: AuthorizationGuard,
}

impl AppServices {
    pub fn new(tokens: TokenService, directory: Arc<dyn PrincipalDirectory>) -> Self {
        Self {
            tokens: Arc::new(tokens),
            directory,
            guard: AuthorizationGuard::default(),
        }
    }

    /// Token service over `config` with an in-process directory.
    ///
    /// The directory starts empty; a storage-backed [`PrincipalDirectory`]
    /// replaces it once user persistence is wired in.
    pub fn from_config(config: &AuthConfig) -> Self {
        let directory: Arc<dyn PrincipalDirectory> = Arc::new(InMemoryPrincipalDirectory::new());
        let tokens = TokenService::from_config(config).with_directory(directory.clone());
        Self::new(tokens, directory)
    }

    /// Entry point for the identity collaborator: record the principal it
    /// resolved, then issue its first token pair.
    ///
    /// Recording first is what lets `/me` report the name and lets a
    /// re-resolving refresh find the subject later.
    pub fn login(&self, principal: &Principal) -> Result<TokenPair, TokenError> {
        self.directory.remember(principal);
        self.tokens.login(principal)
    }
}

impl core::fmt::Debug for AppServices {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppServices")
            .field("tokens", &self.tokens)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}
