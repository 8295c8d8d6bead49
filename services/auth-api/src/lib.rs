//! Mini App Auth API
//!
//! Init-data login and cookie-backed sessions over HTTP.

pub mod config;
pub mod cookie;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::routing::{get, post};
use axum::Router;

pub use config::Config;
pub use state::AppState;

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route("/api/auth", post(handlers::login))
        .route("/api/session", get(handlers::session))
        .route("/protected", get(handlers::protected))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_gate,
        ))
        .layer(axum::middleware::from_fn(middleware::correlation_id))
        .with_state(state)
}
