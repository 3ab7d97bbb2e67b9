//! Liveness and readiness probes
//!
//! `/health` and `/health/live` only prove the process answers.
//! `/health/ready` also needs the credential store, since login cannot
//! work without it.

use crate::{db, state::AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
}

impl HealthStatus {
    fn new(status: &'static str) -> Self {
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database: None,
        }
    }
}

pub async fn health_check() -> Json<HealthStatus> {
    Json(HealthStatus::new("healthy"))
}

pub async fn liveness_check() -> Json<HealthStatus> {
    Json(HealthStatus::new("alive"))
}

/// 503 while the database is unreachable
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    match db::ping(state.db()).await {
        Ok(()) => Json(HealthStatus {
            database: Some("up"),
            ..HealthStatus::new("ready")
        })
        .into_response(),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            let body = HealthStatus {
                database: Some("down"),
                ..HealthStatus::new("not_ready")
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
        }
    }
}
