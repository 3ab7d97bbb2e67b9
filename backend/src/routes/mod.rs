//! Route definitions for the Portfolio API
//!
//! This module organizes all API routes, declares their access policies
//! and applies middleware.

use crate::auth::{authenticate_request, authorize_request, RoutePolicy, RouteTable};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method, Uri},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

mod auth;
mod health;
mod json;


pub use auth::auth_routes;
pub use json::ValidatedJson;

/// Access policy of every route registered by `create_router`
///
/// Anything not listed here still requires a valid token.
pub fn route_table() -> RouteTable {
    RouteTable::new()
        .with(Method::GET, "/", RoutePolicy::public())
        .with(Method::GET, "/health", RoutePolicy::public())
        .with(Method::GET, "/health/ready", RoutePolicy::public())
        .with(Method::GET, "/health/live", RoutePolicy::public())
        .with(Method::POST, "/auth/login", RoutePolicy::public())
        .with(Method::GET, "/auth/profile", RoutePolicy::authenticated())
}

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(|| async { "Portfolio API" }))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/auth", auth::auth_routes());

    let cors = cors_layer(&state.config().cors.allowed_origins);

    guarded(routes, &state)
        .fallback(not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Put the authenticator and authorizer in front of every route in `router`
///
/// Layers run outside-in, so the authenticator (added last) sees the
/// request first. Routes added after this call are not guarded.
pub fn guarded(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router
        .route_layer(from_fn_with_state(state.clone(), authorize_request))
        .route_layer(from_fn_with_state(state.clone(), authenticate_request))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound(format!("Cannot {} {}", method, uri.path()))
}
