//! Error types shared across the Portfolio API crates

use thiserror::Error;

/// Authentication and authorization failures
///
/// Every variant is terminal: the client must re-authenticate or obtain
/// the missing role out of band. Messages deliberately do not say which
/// check failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No token, a malformed token, a bad signature or an expired token
    #[error("Unauthorized")]
    Unauthenticated,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authenticated, but none of the route's required roles are held
    #[error("Forbidden resource")]
    Forbidden,
}

impl AuthError {
    /// Machine readable code used in error bodies
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated | AuthError::InvalidCredentials => "UNAUTHORIZED",
            AuthError::Forbidden => "FORBIDDEN",
        }
    }
}
