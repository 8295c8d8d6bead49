//! Axum extractors for authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use tma_auth_core::unix_now;
use tma_types::{Identity, Session};

use crate::cookie::read_session_cookie;
use crate::state::AppState;

/// Authenticated session extracted from the request
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub identity: Identity,
    pub expires_at: i64,
}

impl From<Session> for SessionUser {
    fn from(session: Session) -> Self {
        Self {
            identity: session.identity,
            expires_at: session.expires_at,
        }
    }
}

/// Error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: AuthErrorDetail,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetail {
    code: &'static str,
    message: &'static str,
}

/// Auth rejection type
#[derive(Debug)]
pub struct AuthRejection {
    code: &'static str,
    message: &'static str,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: AuthErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for SessionUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // The session gate already decoded the cookie for gated routes
            if let Some(session) = parts.extensions.get::<Session>() {
                return Ok(SessionUser::from(session.clone()));
            }

            let app_state = AppState::from_ref(state);

            let token = read_session_cookie(&parts.headers).ok_or(AuthRejection {
                code: "MISSING_SESSION",
                message: "No session cookie provided",
            })?;

            let session = app_state.auth.session(&token, unix_now()).map_err(|_| AuthRejection {
                code: "INVALID_SESSION",
                message: "Invalid or expired session",
            })?;

            Ok(SessionUser::from(session))
        })
    }
}
