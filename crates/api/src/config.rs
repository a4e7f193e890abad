use anyhow::Context;
use axum::http::HeaderValue;

use keystone_auth::{AuthConfig, RefreshRolePolicy};

pub const ENV_PORT: &str = "PORT";
pub const DEFAULT_PORT: u16 = 3001;

pub const ENV_FRONTEND_URL: &str = "FRONTEND_URL";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";

/// Process configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    /// The single browser origin allowed to call the API with credentials.
    pub frontend_origin: HeaderValue,
    pub auth: AuthConfig,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup(ENV_PORT) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT} must be a port number, got '{raw}'"))?,
            None => DEFAULT_PORT,
        };

        let frontend_url = lookup(ENV_FRONTEND_URL).unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());
        let frontend_origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))
            .with_context(|| format!("{ENV_FRONTEND_URL} is not a valid origin: '{frontend_url}'"))?;

        let auth = AuthConfig::from_lookup(&lookup).context("invalid token configuration")?;

        // The server has no login route of its own, so its in-process
        // directory never learns about anyone a re-resolving refresh could find.
        if auth.refresh_role_policy == RefreshRolePolicy::ReResolve {
            anyhow::bail!(
                "JWT_REFRESH_ROLE_POLICY=re-resolve needs a storage-backed principal directory; \
                 this server only has the in-process one"
            );
        }

        Ok(Self {
            port,
            frontend_origin,
            auth,
        })
    }

    pub fn bind_addr(&self) -> std::net::SocketAddr {
        std::net::SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_secret(extra: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| match key {
            "JWT_SECRET" => Some("s3cret".to_string()),
            other => extra
                .iter()
                .find(|(k, _)| *k == other)
                .map(|(_, v)| v.to_string()),
        }
    }

    #[test]
    fn defaults_are_port_3001_and_local_frontend() {
        let config = ApiConfig::from_lookup(with_secret(&[])).unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:3001");
        assert_eq!(config.frontend_origin, "http://localhost:3000");
    }

    #[test]
    fn frontend_url_is_read_without_trailing_slash() {
        let config =
            ApiConfig::from_lookup(with_secret(&[("FRONTEND_URL", "https://app.example.com/")]))
                .unwrap();

        assert_eq!(config.frontend_origin, "https://app.example.com");
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = ApiConfig::from_lookup(|_| None).unwrap_err();
        assert!(format!("{err:#}").contains("JWT_SECRET"));
    }

    #[test]
    fn non_numeric_port_is_fatal() {
        let err = ApiConfig::from_lookup(with_secret(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn re_resolve_policy_is_rejected_without_a_storage_backed_directory() {
        let err = ApiConfig::from_lookup(with_secret(&[("JWT_REFRESH_ROLE_POLICY", "re-resolve")]))
            .unwrap_err();
        assert!(err.to_string().contains("re-resolve"));
    }
}
