use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{Principal, PrincipalId, RoleSet};

/// Distinguishes the two token flavours. A refresh token is recognised by this
/// field alone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl core::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Claims a caller asks to have signed. The codec stamps the time window and
/// token id when it signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    pub sub: PrincipalId,
    pub email: Option<String>,
    pub roles: RoleSet,
    pub kind: TokenKind,
}

impl ClaimSet {
    /// Access claims for a freshly resolved principal. A missing email is
    /// carried as the empty string.
    pub fn access(principal: &Principal) -> Self {
        Self {
            sub: principal.id.clone(),
            email: Some(principal.email.clone().unwrap_or_default()),
            roles: principal.roles.clone(),
            kind: TokenKind::Access,
        }
    }

    /// Refresh claims carry the subject only.
    pub fn refresh(sub: PrincipalId) -> Self {
        Self {
            sub,
            email: None,
            roles: RoleSet::new(),
            kind: TokenKind::Refresh,
        }
    }
}

/// Signed token payload.
///
/// Timestamps use JWT numeric-date encoding (`iat`/`exp`, whole seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject / principal identifier.
    pub sub: PrincipalId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Roles held at issuance. Always empty on refresh tokens.
    #[serde(default, skip_serializing_if = "RoleSet::is_empty")]
    pub roles: RoleSet,

    #[serde(rename = "type")]
    pub kind: TokenKind,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,

    /// Unique token id.
    pub jti: Uuid,
}

impl TokenClaims {
    pub fn is_refresh(&self) -> bool {
        self.kind == TokenKind::Refresh
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("expected a {expected} token, got {found}")]
    WrongKind { expected: TokenKind, found: TokenKind },

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Deterministically validate the time window of decoded claims.
///
/// Only `exp` is checked. `iat` is informational: a token stamped by a signer
/// whose clock runs ahead of ours is still accepted.
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenError> {
    if now >= claims.expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}
