//! Application state

use std::sync::Arc;
use tma_auth_core::AuthService;

use crate::config::Config;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service for init-data verification and session management
    pub auth: Arc<AuthService>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Self {
        Self {
            auth: Arc::new(AuthService::new(config.auth.clone())),
            config: Arc::new(config),
        }
    }
}
