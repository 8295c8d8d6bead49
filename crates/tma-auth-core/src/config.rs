//! Configuration types for the auth core

use std::time::Duration;
use zeroize::Zeroizing;

use crate::ConfigError;

/// Maximum age of `auth_date` in seconds. Not configurable.
pub const FRESHNESS_WINDOW_SECS: i64 = 300;

/// Default session lifetime (1 hour)
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// Default renewal threshold (10 minutes before expiry)
pub const DEFAULT_RENEWAL_THRESHOLD: Duration = Duration::from_secs(10 * 60);

/// Secret bytes that are wiped on drop and never printed
#[derive(Clone)]
pub struct Secret(Zeroizing<Vec<u8>>);

impl Secret {
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self(Zeroizing::new(bytes.as_ref().to_vec()))
    }

    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret([REDACTED; {}])", self.0.len())
    }
}

/// Auth core configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Platform signing secret (the bot token)
    pub signing_secret: Secret,
    /// Dedicated session secret; the signing secret is used when absent
    pub session_secret: Option<Secret>,
    /// Session duration
    pub session_ttl: Duration,
    /// Remaining lifetime at or below which `refresh` re-issues a token
    pub renewal_threshold: Duration,
}

impl AuthConfig {
    /// Minimum allowed length of a dedicated session secret (256 bits)
    pub const MIN_SESSION_SECRET_LENGTH: usize = 32;

    /// Create a new auth config
    pub fn new(signing_secret: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
        if signing_secret.as_ref().is_empty() {
            return Err(ConfigError::Missing("SIGNING_SECRET"));
        }
        Ok(Self {
            signing_secret: Secret::new(signing_secret),
            session_secret: None,
            session_ttl: DEFAULT_SESSION_TTL,
            renewal_threshold: DEFAULT_RENEWAL_THRESHOLD,
        })
    }

    /// Use a dedicated secret for session tokens
    pub fn with_session_secret(mut self, secret: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
        let secret = secret.as_ref();
        if secret.len() < Self::MIN_SESSION_SECRET_LENGTH {
            return Err(ConfigError::KeyTooShort {
                name: "SESSION_SECRET",
                actual: secret.len(),
                minimum: Self::MIN_SESSION_SECRET_LENGTH,
            });
        }
        self.session_secret = Some(Secret::new(secret));
        Ok(self)
    }

    /// Set session duration
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Set renewal threshold
    pub fn with_renewal_threshold(mut self, threshold: Duration) -> Self {
        self.renewal_threshold = threshold;
        self
    }

    /// Secret the session key is derived from
    pub fn session_key_material(&self) -> &Secret {
        self.session_secret.as_ref().unwrap_or(&self.signing_secret)
    }
}
