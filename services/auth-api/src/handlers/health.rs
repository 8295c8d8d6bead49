//! Health check handlers

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub checks: ReadyChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyChecks {
    pub session_key: &'static str,
    pub secure_cookies: bool,
}

/// GET /health - Liveness probe (fast, no dependencies)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "auth-api",
    })
}

/// GET /ready - Readiness probe
///
/// Key material is validated at startup, so a running service is ready.
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let session_key = if state.auth.config().session_secret.is_some() {
        "dedicated"
    } else {
        "derived_from_signing_secret"
    };

    Json(ReadyResponse {
        status: "ready",
        service: "auth-api",
        checks: ReadyChecks {
            session_key,
            secure_cookies: state.config.secure_cookies,
        },
    })
}
