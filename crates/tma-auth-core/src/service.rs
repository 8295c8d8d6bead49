//! Auth service - ties together init-data verification and session management

use tma_types::{Identity, Session, Timestamp};
use tracing::{debug, info, warn};

use crate::{
    config::AuthConfig,
    session::{IssuedToken, SessionManager},
    verifier::{VerifiedInitData, Verifier},
    AuthError,
};

/// Current Unix time in seconds
pub fn unix_now() -> Timestamp {
    chrono::Utc::now().timestamp()
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Verified init data
    pub init_data: VerifiedInitData,
    /// Session token for the transport layer
    pub session: IssuedToken,
}

/// Authentication service
///
/// Provides a unified interface for:
/// - Init-data verification
/// - Session token issuance, validation, and renewal
///
/// Every operation is synchronous and CPU-bound; the service holds only
/// read-only key material and can be shared freely behind an `Arc`.
pub struct AuthService {
    config: AuthConfig,
    verifier: Verifier,
    session_manager: SessionManager,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(config: AuthConfig) -> Self {
        Self {
            verifier: Verifier::new(config.signing_secret.expose()),
            session_manager: SessionManager::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn verifier(&self) -> &Verifier {
        &self.verifier
    }

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Verify raw init data and open a session for the embedded identity
    pub fn authenticate(&self, raw: &str, now: Timestamp) -> Result<Authenticated, AuthError> {
        let init_data = self.verifier.verify_init_data(raw, now).map_err(|e| {
            warn!(kind = e.error_code(), "Init data rejected");
            AuthError::from(e)
        })?;

        let session = self
            .session_manager
            .create_session(init_data.identity.clone(), now)?;

        info!(
            user_id = %init_data.identity.id,
            expires_at = session.expires_at,
            "Session issued"
        );

        Ok(Authenticated { init_data, session })
    }

    // =========================================================================
    // Session Validation
    // =========================================================================

    /// Validate a session token
    pub fn validate_session(&self, token: &str, now: Timestamp) -> Result<Identity, AuthError> {
        self.session(token, now).map(|session| session.identity)
    }

    /// Validate a session token and return the full session
    pub fn session(&self, token: &str, now: Timestamp) -> Result<Session, AuthError> {
        self.session_manager.decode_session(token, now).map_err(|e| {
            debug!(kind = e.error_code(), "Session rejected");
            AuthError::from(e)
        })
    }

    /// Renew a session token near expiry; `None` if no renewal is due
    pub fn refresh_session(
        &self,
        token: &str,
        now: Timestamp,
    ) -> Result<Option<IssuedToken>, AuthError> {
        self.session_manager.refresh(token, now)
    }

    /// Renew a session token unconditionally (sliding sessions)
    pub fn extend_session(&self, token: &str, now: Timestamp) -> Result<IssuedToken, AuthError> {
        self.session_manager.extend(token, now)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("config", &self.config)
            .finish()
    }
}
