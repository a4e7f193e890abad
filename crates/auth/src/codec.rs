//! Signed, time-bound bearer tokens.

use std::sync::Arc;
use std::time::Duration;

use chrono::SubsecRound;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::claims::validate_claims;
use crate::{ClaimSet, Clock, SystemClock, TokenClaims, TokenError};

/// Creates and verifies signed tokens.
///
/// Implementations must be pure CPU work: no IO, no shared mutable state.
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` with a validity window of `[now, now + ttl)`.
    fn sign(&self, claims: ClaimSet, ttl: Duration) -> Result<String, TokenError>;

    /// Check signature, payload shape and expiry.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

/// HMAC-SHA256 JWT codec.
///
/// Expiry is checked against the injected [`Clock`] rather than the JWT
/// library's own notion of time, so the `now >= exp` boundary is exact.
pub struct Hs256TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl Hs256TokenCodec {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        Self::with_clock(secret, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: impl AsRef<[u8]>, clock: Arc<dyn Clock>) -> Self {
        let secret = secret.as_ref();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }
}

impl TokenCodec for Hs256TokenCodec {
    fn sign(&self, claims: ClaimSet, ttl: Duration) -> Result<String, TokenError> {
        // JWT timestamps are whole seconds; truncate so the signed window is the checked window.
        let issued_at = self.clock.now().trunc_subsecs(0);
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|_| TokenError::Signing("ttl out of range".to_string()))?;
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::Signing("expiry out of range".to_string()))?;

        let payload = TokenClaims {
            sub: claims.sub,
            email: claims.email,
            roles: claims.roles,
            kind: claims.kind,
            issued_at,
            expires_at,
            jti: Uuid::now_v7(),
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| map_jwt_error(e.kind()))?;

        validate_claims(&data.claims, self.clock.now())?;
        Ok(data.claims)
    }
}

fn map_jwt_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}

impl core::fmt::Debug for Hs256TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}
