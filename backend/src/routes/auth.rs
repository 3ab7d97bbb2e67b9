//! Authentication routes
//!
//! # Performance Optimizations
//!
//! - Uses pre-computed JWT keys from AppState (no per-request allocation)
//! - Password verification runs on blocking thread pool (doesn't block async runtime)

use super::json::ValidatedJson;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{AuthService, Credential};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use portfolio_shared::{AccessToken, IdentityProfile, LoginRequest};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/profile", get(profile))
}

/// Login with email and password
///
/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AccessToken>> {
    let token =
        AuthService::authenticate_and_login(state.users(), state.jwt(), Credential::from(req)).await?;
    Ok(Json(token))
}

/// Identity attached to the current request
///
/// GET /auth/profile
///
/// # Authentication
/// Requires valid Bearer token in Authorization header.
async fn profile(AuthUser(identity): AuthUser) -> Json<IdentityProfile> {
    Json(identity.into())
}
