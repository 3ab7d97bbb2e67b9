//! Authentication middleware
//!
//! Axum glue for the guards: `authenticate_request` and
//! `authorize_request` are applied with `route_layer`, so they only run for
//! matched routes and can read the route's `MatchedPath`.
//!
//! # Performance
//!
//! Uses pre-computed JWT keys from AppState to avoid expensive
//! key derivation on every request.

use super::claims::IdentityClaims;
use super::guard::{self, Access};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, MatchedPath, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use portfolio_shared::AuthError;

fn matched_path(request: &Request) -> Option<&str> {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
}

/// First guard: verify the bearer token and attach the identity
pub async fn authenticate_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let policy = state
        .routes()
        .policy_for(request.method(), matched_path(&request));

    let access = guard::authenticate(policy, request.headers().get(AUTHORIZATION), state.jwt())?;

    if let Access::Authenticated(identity) = access {
        request.extensions_mut().insert(identity);
    }

    Ok(next.run(request).await)
}

/// Second guard: enforce the route's required roles
pub async fn authorize_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let policy = state
        .routes()
        .policy_for(request.method(), matched_path(&request));

    guard::authorize(policy, request.extensions().get::<IdentityClaims>())?;

    Ok(next.run(request).await)
}

/// Identity of the caller, for handlers on protected routes
///
/// Reads the identity attached by `authenticate_request`. When a handler
/// is mounted without the guards, the bearer token is verified here
/// instead.
#[derive(Debug, Clone)]
pub struct AuthUser(pub IdentityClaims);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<IdentityClaims>() {
            return Ok(AuthUser(identity.clone()));
        }

        let app_state = AppState::from_ref(state);
        let token = guard::bearer_token(parts.headers.get(AUTHORIZATION))
            .ok_or(AuthError::Unauthenticated)?;
        let identity = app_state
            .jwt()
            .verify(token)
            .map_err(|_| AuthError::Unauthenticated)?;

        Ok(AuthUser(identity))
    }
}
