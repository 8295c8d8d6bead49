//! Session cookie encoding

use axum::http::{header, HeaderMap, HeaderValue};
use chrono::DateTime;
use tma_auth_core::IssuedToken;

use crate::error::ApiError;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session";

/// Build the `Set-Cookie` value for an issued session token.
///
/// `HttpOnly; SameSite=Strict` always; `Secure` when `secure` is set. Expiry
/// matches the session's own expiry. `Max-Age` is at least 1 so a token that
/// is still valid for its issue second is not discarded on arrival.
pub fn session_cookie(issued: &IssuedToken, now: i64, secure: bool) -> Result<HeaderValue, ApiError> {
    let expires = DateTime::from_timestamp(issued.expires_at, 0)
        .ok_or_else(|| ApiError::Internal("session expiry out of range".to_string()))?
        .format("%a, %d %b %Y %H:%M:%S GMT");
    let max_age = issued.expires_at.saturating_sub(now).max(1);

    let mut cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age}; Expires={expires}",
        issued.token.as_str()
    );
    if secure {
        cookie.push_str("; Secure");
    }

    HeaderValue::from_str(&cookie)
        .map_err(|_| ApiError::Internal("invalid session cookie".to_string()))
}

/// Read the session token from the request's `Cookie` headers
pub fn read_session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
