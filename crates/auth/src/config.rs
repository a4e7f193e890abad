//! Token configuration, read from environment-style key/value pairs.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::ttl::parse_ttl;

pub const ENV_SECRET: &str = "JWT_SECRET";
pub const ENV_ACCESS_TTL: &str = "JWT_EXPIRES_IN";
pub const ENV_REFRESH_TTL: &str = "JWT_REFRESH_EXPIRES_IN";
pub const ENV_REFRESH_ROLE_POLICY: &str = "JWT_REFRESH_ROLE_POLICY";

pub const DEFAULT_ACCESS_TTL: &str = "15m";
pub const DEFAULT_REFRESH_TTL: &str = "7d";

const RECOMMENDED_SECRET_LEN: usize = 32;

/// Where a refreshed access token gets its roles and email from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RefreshRolePolicy {
    /// Reuse whatever the refresh token carries. Refresh tokens carry no roles,
    /// so the new access token has none until the next login.
    #[default]
    TrustEmbedded,
    /// Look the subject up in the principal directory on every refresh.
    ReResolve,
}

impl FromStr for RefreshRolePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trust-embedded" | "trust_embedded" => Ok(Self::TrustEmbedded),
            "re-resolve" | "re_resolve" | "reresolve" => Ok(Self::ReResolve),
            other => Err(ConfigError::InvalidRefreshPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set to a non-empty value")]
    MissingSecret,

    #[error("invalid refresh role policy '{0}' (expected trust-embedded or re-resolve)")]
    InvalidRefreshPolicy(String),
}

#[derive(Clone)]
pub struct AuthConfig {
    secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub refresh_role_policy: RefreshRolePolicy,
}

impl AuthConfig {
    /// Config with the given secret and default lifetimes (15m / 7d).
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                min_len = RECOMMENDED_SECRET_LEN,
                "signing secret is shorter than recommended"
            );
        }

        Ok(Self {
            secret,
            access_ttl: parse_ttl(DEFAULT_ACCESS_TTL),
            refresh_ttl: parse_ttl(DEFAULT_REFRESH_TTL),
            refresh_role_policy: RefreshRolePolicy::default(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process env in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(ENV_SECRET).ok_or(ConfigError::MissingSecret)?;
        let mut config = Self::new(secret)?;

        config.access_ttl =
            parse_ttl(&lookup(ENV_ACCESS_TTL).unwrap_or_else(|| DEFAULT_ACCESS_TTL.to_string()));
        config.refresh_ttl =
            parse_ttl(&lookup(ENV_REFRESH_TTL).unwrap_or_else(|| DEFAULT_REFRESH_TTL.to_string()));

        if let Some(policy) = lookup(ENV_REFRESH_ROLE_POLICY) {
            config.refresh_role_policy = policy.parse()?;
        }

        Ok(config)
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    pub fn with_refresh_role_policy(mut self, policy: RefreshRolePolicy) -> Self {
        self.refresh_role_policy = policy;
        self
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("refresh_role_policy", &self.refresh_role_policy)
            .finish()
    }
}
