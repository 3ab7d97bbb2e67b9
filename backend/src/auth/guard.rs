//! Request guards
//!
//! Two decisions run in order on every matched route: the authenticator
//! turns the `Authorization` header into an identity, then the authorizer
//! checks that identity against the route's required roles. Both are pure
//! functions; the middleware in `middleware.rs` wires them into axum.

use super::claims::IdentityClaims;
use super::jwt::JwtService;
use super::policy::RoutePolicy;
use axum::http::HeaderValue;
use portfolio_shared::AuthError;
use tracing::debug;

/// Outcome of the authenticator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Public route, the header was not inspected
    Public,
    Authenticated(IdentityClaims),
}

/// Extract the token from a `Bearer <token>` header value
pub fn bearer_token(header: Option<&HeaderValue>) -> Option<&str> {
    let value = header?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authenticator: public pass-through, or a verified identity
///
/// Every failure maps to the same `Unauthenticated` error; the reason is
/// only logged.
pub fn authenticate(
    policy: &RoutePolicy,
    authorization: Option<&HeaderValue>,
    jwt: &JwtService,
) -> Result<Access, AuthError> {
    if policy.public {
        return Ok(Access::Public);
    }

    let token = bearer_token(authorization).ok_or_else(|| {
        debug!("Missing or malformed authorization header");
        AuthError::Unauthenticated
    })?;

    let identity = jwt.verify(token).map_err(|e| {
        debug!(error = %e, "Bearer token rejected");
        AuthError::Unauthenticated
    })?;

    Ok(Access::Authenticated(identity))
}

/// Authorizer: role check against the route's allow-list
pub fn authorize(policy: &RoutePolicy, identity: Option<&IdentityClaims>) -> Result<(), AuthError> {
    if policy.public {
        return Ok(());
    }

    let identity = identity.ok_or(AuthError::Unauthenticated)?;

    if policy.required_roles.is_empty() || identity.has_any_role(&policy.required_roles) {
        return Ok(());
    }

    debug!(
        user_id = %identity.user_id,
        required = ?policy.required_roles,
        "Identity lacks a required role"
    );
    Err(AuthError::Forbidden)
}
