//! Authentication handlers (login, session, protected)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tma_auth_core::unix_now;
use tma_types::Identity;

use crate::cookie::session_cookie;
use crate::error::{ApiError, ApiResult};
use crate::extractors::SessionUser;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Raw init-data string as handed to the Mini App
    #[serde(rename = "initData")]
    pub init_data: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: Identity,
    pub expires_at: i64,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub user: Identity,
}

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub user: Identity,
    pub expires_at: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth
///
/// Exchange verified init data for a session cookie
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let raw = req
        .init_data
        .ok_or_else(|| ApiError::BadRequest("initData is required".to_string()))?;

    let now = unix_now();
    let auth = state.auth.authenticate(&raw, now)?;
    let cookie = session_cookie(&auth.session, now, state.config.secure_cookies)?;

    let response = LoginResponse {
        message: "Authentication successful",
        user: auth.init_data.identity,
        expires_at: auth.session.expires_at,
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// GET /api/session
///
/// Report the identity behind the current session cookie
pub async fn session(user: SessionUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: true,
        user: user.identity,
    })
}

/// GET /protected
pub async fn protected(user: SessionUser) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        user: user.identity,
        expires_at: user.expires_at,
    })
}
