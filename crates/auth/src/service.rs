//! Token lifecycle: login, refresh (rotation) and verification.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    AuthConfig, AuthError, AuthResult, ClaimSet, Hs256TokenCodec, Principal, PrincipalDirectory,
    RefreshRolePolicy, TokenClaims, TokenCodec, TokenError, TokenKind,
};

/// Access/refresh tokens handed to a client. Nothing about the pair is stored
/// server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires.
    pub expires_in: u64,
}

/// Issues, rotates and verifies token pairs.
///
/// Stateless: a token stays valid until it expires, regardless of logout or
/// role changes. Every token carries a `jti`, which is where a deny-list would
/// hook in.
pub struct TokenService {
    codec: Arc<dyn TokenCodec>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    refresh_role_policy: RefreshRolePolicy,
    directory: Option<Arc<dyn PrincipalDirectory>>,
}

impl TokenService {
    pub fn new(codec: Arc<dyn TokenCodec>, config: &AuthConfig) -> Self {
        Self {
            codec,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
            refresh_role_policy: config.refresh_role_policy,
            directory: None,
        }
    }

    /// Service backed by an HS256 codec keyed with the configured secret.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(Arc::new(Hs256TokenCodec::new(config.secret())), config)
    }

    /// Directory consulted on refresh under [`RefreshRolePolicy::ReResolve`].
    pub fn with_directory(mut self, directory: Arc<dyn PrincipalDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }

    pub fn refresh_role_policy(&self) -> RefreshRolePolicy {
        self.refresh_role_policy
    }

    /// Issue a fresh pair for a principal whose roles were just resolved.
    ///
    /// Signing with a valid HMAC key does not fail in practice; the error only
    /// surfaces for out-of-range lifetimes.
    pub fn login(&self, principal: &Principal) -> Result<TokenPair, TokenError> {
        let pair = self.issue_pair(ClaimSet::access(principal))?;
        tracing::info!(sub = %principal.id, roles = principal.roles.len(), "issued token pair");
        Ok(pair)
    }

    /// Rotate a refresh token into a brand-new pair.
    ///
    /// Returns `None` for any invalid, expired or non-refresh token. The old
    /// refresh token is not invalidated.
    pub fn refresh(&self, refresh_token: &str) -> Option<TokenPair> {
        let claims = match self.codec.verify(refresh_token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "refresh rejected");
                return None;
            }
        };

        if claims.kind != TokenKind::Refresh {
            let e = TokenError::WrongKind {
                expected: TokenKind::Refresh,
                found: claims.kind,
            };
            tracing::debug!(error = %e, sub = %claims.sub, "refresh rejected");
            return None;
        }

        let access = match self.refresh_role_policy {
            RefreshRolePolicy::TrustEmbedded => ClaimSet {
                email: Some(claims.email.clone().unwrap_or_default()),
                roles: claims.roles.clone(),
                sub: claims.sub.clone(),
                kind: TokenKind::Access,
            },
            RefreshRolePolicy::ReResolve => {
                let Some(directory) = &self.directory else {
                    tracing::error!("re-resolve refresh policy configured without a principal directory");
                    return None;
                };
                let Some(principal) = directory.find(&claims.sub) else {
                    tracing::debug!(sub = %claims.sub, "refresh rejected: principal no longer exists");
                    return None;
                };
                ClaimSet {
                    sub: claims.sub.clone(),
                    ..ClaimSet::access(&principal)
                }
            }
        };

        match self.issue_pair(access) {
            Ok(pair) => {
                tracing::info!(sub = %claims.sub, "rotated token pair");
                Some(pair)
            }
            Err(e) => {
                tracing::error!(error = %e, sub = %claims.sub, "failed to sign rotated pair");
                None
            }
        }
    }

    /// Raw verification for introspection. No kind check.
    pub fn verify(&self, token: &str) -> Option<TokenClaims> {
        self.codec
            .verify(token)
            .inspect_err(|e| tracing::debug!(error = %e, "token rejected"))
            .ok()
    }

    /// Verify a bearer credential: must be a valid *access* token.
    pub fn authenticate(&self, token: &str) -> AuthResult<TokenClaims> {
        let claims = self.codec.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "bearer token rejected");
            AuthError::from(e)
        })?;

        if claims.kind != TokenKind::Access {
            tracing::debug!(sub = %claims.sub, kind = %claims.kind, "bearer token rejected: not an access token");
            return Err(AuthError::Unauthenticated);
        }

        Ok(claims)
    }

    fn issue_pair(&self, access: ClaimSet) -> Result<TokenPair, TokenError> {
        let refresh = ClaimSet::refresh(access.sub.clone());

        Ok(TokenPair {
            access_token: self.codec.sign(access, self.access_ttl)?,
            refresh_token: self.codec.sign(refresh, self.refresh_ttl)?,
            expires_in: self.access_ttl.as_secs(),
        })
    }
}

impl core::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("refresh_role_policy", &self.refresh_role_policy)
            .field("directory", &self.directory.is_some())
            .finish_non_exhaustive()
    }
}
