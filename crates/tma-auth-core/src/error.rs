//! Auth errors
//!
//! Display strings are safe to return to clients: they never include secret
//! material, the data-check string, or signature bytes.

use thiserror::Error;

/// Init-data verification failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationError {
    /// No `hash` field in the payload
    #[error("Hash is missing in the init data.")]
    MissingHash,

    /// No `auth_date` field in the payload
    #[error("Auth date is missing in the init data.")]
    MissingTimestamp,

    /// `auth_date` is not an integer
    #[error("Auth date is malformed.")]
    MalformedTimestamp,

    /// `auth_date` is older than the freshness window
    #[error("Auth data is too old. Please try again.")]
    Expired,

    /// Recomputed signature does not match `hash`
    #[error("Init data signature is invalid.")]
    BadSignature,

    /// Signature is valid but there is no `user` field
    #[error("User data is missing in the init data.")]
    MissingUser,

    /// Signature is valid but `user` does not parse
    #[error("Error parsing user data.")]
    MalformedUser,
}

impl VerificationError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingHash => "MISSING_HASH",
            Self::MissingTimestamp => "MISSING_TIMESTAMP",
            Self::MalformedTimestamp => "MALFORMED_TIMESTAMP",
            Self::Expired => "INIT_DATA_EXPIRED",
            Self::BadSignature => "BAD_SIGNATURE",
            Self::MissingUser => "MISSING_USER",
            Self::MalformedUser => "MALFORMED_USER",
        }
    }
}

/// Session token failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// Token failed its integrity check
    #[error("session token failed integrity check")]
    Tampered,

    /// Token is not structurally a session token
    #[error("session token is malformed")]
    Malformed,

    /// Token was valid but its lifetime has elapsed
    #[error("session expired")]
    Expired,
}

impl SessionError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Tampered => "SESSION_TAMPERED",
            Self::Malformed => "SESSION_MALFORMED",
            Self::Expired => "SESSION_EXPIRED",
        }
    }
}

/// Startup configuration failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting is absent
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    /// A setting is present but unusable
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    /// A secret is shorter than the minimum key length
    #[error("{name} too short: got {actual} bytes, need at least {minimum}")]
    KeyTooShort {
        name: &'static str,
        actual: usize,
        minimum: usize,
    },
}

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Init data was rejected
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// Session token was rejected
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Verification(_) | Self::Session(_) => 401,
            Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Verification(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller should be treated as unauthenticated
    pub fn is_unauthenticated(&self) -> bool {
        self.status_code() == 401
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_scope_errors_are_unauthenticated() {
        let err = AuthError::from(VerificationError::BadSignature);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.error_code(), "BAD_SIGNATURE");
        assert!(err.is_unauthenticated());

        let err = AuthError::from(SessionError::Expired);
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.error_code(), "SESSION_EXPIRED");
    }

    #[test]
    fn test_configuration_error_is_fatal_kind() {
        let err = AuthError::from(ConfigError::Missing("SIGNING_SECRET"));
        assert_eq!(err.status_code(), 500);
        assert!(!err.is_unauthenticated());
        assert!(err.to_string().contains("SIGNING_SECRET"));
    }

    #[test]
    fn test_verification_display_is_reason_string() {
        assert_eq!(
            VerificationError::Expired.to_string(),
            "Auth data is too old. Please try again."
        );
        assert_eq!(
            AuthError::from(VerificationError::MissingHash).to_string(),
            "Hash is missing in the init data."
        );
    }
}
