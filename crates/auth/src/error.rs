//! Outward error taxonomy.

use thiserror::Error;

use crate::TokenError;

/// The only failures callers see.
///
/// Token failures of every kind collapse into `Unauthenticated` so no
/// cryptographic detail leaks. `Forbidden` means the caller was authenticated
/// but holds no satisfying role, and is never merged with `Unauthenticated`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,
}

impl From<TokenError> for AuthError {
    fn from(_: TokenError) -> Self {
        AuthError::Unauthenticated
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
