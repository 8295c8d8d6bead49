//! Request middleware: correlation IDs and the session gate

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tma_auth_core::{unix_now, IssuedToken};
use tracing::Instrument;
use uuid::Uuid;

use crate::cookie::{read_session_cookie, session_cookie};
use crate::state::AppState;

/// Response header echoing the request's correlation ID
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Correlation ID assigned to each request
#[derive(Debug, Clone, Copy)]
pub struct CorrelationId(pub Uuid);

/// Run each request inside a span tagged with a fresh correlation ID
pub async fn correlation_id(mut request: Request, next: Next) -> Response {
    let id = Uuid::new_v4();
    request.extensions_mut().insert(CorrelationId(id));

    let span = tracing::info_span!(
        "request",
        correlation_id = %id,
        method = %request.method(),
        path = %request.uri().path(),
    );

    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}

fn is_protected(path: &str) -> bool {
    path == "/protected" || path.starts_with("/protected/")
}

fn is_gated(path: &str) -> bool {
    is_protected(path) || path.starts_with("/api/")
}

/// Session gate over `/protected/*` and `/api/*`.
///
/// Protected paths without a valid session redirect to `/`. A valid session
/// is attached to the request and its cookie renewed per the configured
/// policy.
pub async fn session_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    if !is_gated(&path) {
        return next.run(request).await;
    }

    let now = unix_now();
    let token = read_session_cookie(request.headers());

    let session = match token.as_deref().map(|token| state.auth.session(token, now)) {
        Some(Ok(session)) => session,
        Some(Err(e)) if is_protected(&path) => {
            tracing::warn!(kind = e.error_code(), "Protected route denied");
            return Redirect::to("/").into_response();
        }
        None if is_protected(&path) => {
            tracing::debug!("Protected route denied: no session");
            return Redirect::to("/").into_response();
        }
        _ => return next.run(request).await,
    };

    request.extensions_mut().insert(session);
    let mut response = next.run(request).await;

    // A handler that set its own session cookie wins.
    if response.headers().contains_key(header::SET_COOKIE) {
        return response;
    }

    if let Some(token) = token {
        if let Some(renewed) = renew(&state, &token, now) {
            match session_cookie(&renewed, now, state.config.secure_cookies) {
                Ok(cookie) => {
                    tracing::debug!(expires_at = renewed.expires_at, "Session renewed");
                    response.headers_mut().append(header::SET_COOKIE, cookie);
                }
                Err(e) => tracing::error!(error = %e, "Failed to encode renewed session"),
            }
        }
    }

    response
}

fn renew(state: &AppState, token: &str, now: i64) -> Option<IssuedToken> {
    let result = if state.config.sliding_sessions {
        state.auth.extend_session(token, now).map(Some)
    } else {
        state.auth.refresh_session(token, now)
    };

    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Session renewal failed");
        None
    })
}
