//! Session management with encrypted tokens
//!
//! Token wire format (base64url, no padding):
//!
//! ```text
//! version (1 byte) || nonce (24 bytes) || XChaCha20-Poly1305(session JSON) || tag (16 bytes)
//! ```
//!
//! The session contents are confidential and any modification is detected
//! by the AEAD tag.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use std::time::Duration;
use tma_types::{Identity, Session, Timestamp};

use crate::config::AuthConfig;
use crate::crypto::{self, SessionKey, NONCE_LENGTH};
use crate::{AuthError, SessionError};

/// Current token format version
pub const TOKEN_VERSION: u8 = 1;

/// Poly1305 tag length in bytes
const TAG_LENGTH: usize = 16;

/// Associated data binding ciphertexts to this token format
const TOKEN_AAD: &[u8] = b"tma-session-v1";

/// Opaque session token as handed to the transport layer
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionToken(len={})", self.0.len())
    }
}

/// A freshly issued token together with its validity bounds
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: SessionToken,
    pub issued_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Session manager handles token issuance, decoding, and renewal.
///
/// Holds only the read-only session key; every call is independent.
#[derive(Clone)]
pub struct SessionManager {
    key: SessionKey,
    session_ttl: Duration,
    renewal_threshold: Duration,
}

impl SessionManager {
    /// Create a session manager from auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            key: SessionKey::derive(config.session_key_material().expose()),
            session_ttl: config.session_ttl,
            renewal_threshold: config.renewal_threshold,
        }
    }

    /// Create a session manager with an explicit key
    pub fn with_key(key: SessionKey, session_ttl: Duration, renewal_threshold: Duration) -> Self {
        Self {
            key,
            session_ttl,
            renewal_threshold,
        }
    }

    /// Configured session lifetime
    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Issue a token for `identity` valid until `now + ttl`
    pub fn issue(
        &self,
        identity: Identity,
        now: Timestamp,
        ttl: Duration,
    ) -> Result<IssuedToken, AuthError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let session = Session::new(identity, now, ttl_secs);
        let token = self.seal(&session)?;

        Ok(IssuedToken {
            token,
            issued_at: session.issued_at,
            expires_at: session.expires_at,
        })
    }

    /// Issue a token with the configured lifetime
    pub fn create_session(
        &self,
        identity: Identity,
        now: Timestamp,
    ) -> Result<IssuedToken, AuthError> {
        self.issue(identity, now, self.session_ttl)
    }

    /// Decode a token and return the embedded identity
    pub fn decode(&self, token: &str, now: Timestamp) -> Result<Identity, SessionError> {
        self.decode_session(token, now).map(|session| session.identity)
    }

    /// Decode a token and return the full session
    pub fn decode_session(&self, token: &str, now: Timestamp) -> Result<Session, SessionError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| SessionError::Malformed)?;

        let (&version, rest) = bytes.split_first().ok_or(SessionError::Malformed)?;
        if version != TOKEN_VERSION {
            tracing::debug!(version, "Unknown session token version");
            return Err(SessionError::Malformed);
        }
        if rest.len() < NONCE_LENGTH + TAG_LENGTH {
            return Err(SessionError::Malformed);
        }

        let (nonce, ciphertext) = rest.split_at(NONCE_LENGTH);
        let nonce: &[u8; NONCE_LENGTH] = nonce.try_into().map_err(|_| SessionError::Malformed)?;

        let plaintext = crypto::open(&self.key, TOKEN_AAD, nonce, ciphertext).map_err(|_| {
            tracing::debug!("Session token failed integrity check");
            SessionError::Tampered
        })?;

        let session: Session =
            serde_json::from_slice(&plaintext).map_err(|_| SessionError::Malformed)?;

        if session.is_expired(now) {
            return Err(SessionError::Expired);
        }

        Ok(session)
    }

    /// Re-issue a still-valid token that is within the renewal threshold of expiry.
    ///
    /// Returns `Ok(None)` when the token is valid and not yet due for renewal.
    pub fn refresh(&self, token: &str, now: Timestamp) -> Result<Option<IssuedToken>, AuthError> {
        let session = self.decode_session(token, now)?;

        let threshold = i64::try_from(self.renewal_threshold.as_secs()).unwrap_or(i64::MAX);
        if session.remaining(now) > threshold {
            return Ok(None);
        }

        self.create_session(session.identity, now).map(Some)
    }

    /// Re-issue a still-valid token unconditionally (sliding expiry)
    pub fn extend(&self, token: &str, now: Timestamp) -> Result<IssuedToken, AuthError> {
        let session = self.decode_session(token, now)?;
        self.create_session(session.identity, now)
    }

    fn seal(&self, session: &Session) -> Result<SessionToken, AuthError> {
        let json = serde_json::to_vec(session).map_err(|e| {
            tracing::error!("Failed to serialize session: {}", e);
            AuthError::Internal("Failed to create session".to_string())
        })?;

        let (nonce, ciphertext) = crypto::seal(&self.key, TOKEN_AAD, &json).map_err(|e| {
            tracing::error!("Failed to encrypt session: {}", e);
            AuthError::Internal("Failed to create session".to_string())
        })?;

        let mut bytes = Vec::with_capacity(1 + NONCE_LENGTH + ciphertext.len());
        bytes.push(TOKEN_VERSION);
        bytes.extend_from_slice(&nonce);
        bytes.extend_from_slice(&ciphertext);

        Ok(SessionToken(URL_SAFE_NO_PAD.encode(bytes)))
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_ttl", &self.session_ttl)
            .field("renewal_threshold", &self.renewal_threshold)
            .finish_non_exhaustive()
    }
}
