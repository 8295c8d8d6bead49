//! Configuration for the Auth API service.

use std::time::Duration;
use tma_auth_core::{AuthConfig, ConfigError};

/// Auth API configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub http_port: u16,

    /// Auth core configuration
    pub auth: AuthConfig,

    /// Mark session cookies `Secure` (production deployments)
    pub secure_cookies: bool,

    /// Re-issue the session cookie on every authenticated request
    pub sliding_sessions: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // Platform signing secret (the bot token)
        let signing_secret = lookup("SIGNING_SECRET")
            .or_else(|| lookup("BOT_TOKEN"))
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("SIGNING_SECRET"))?;

        // Server port
        let http_port = lookup("HTTP_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("HTTP_PORT"))?;

        // Session lifetime (default 1 hour)
        let session_ttl_secs: u64 = lookup("SESSION_TTL_SECS")
            .unwrap_or_else(|| "3600".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("SESSION_TTL_SECS"))?;

        // Renewal threshold (default 10 minutes)
        let renewal_secs: u64 = lookup("SESSION_RENEWAL_SECS")
            .unwrap_or_else(|| "600".to_string())
            .parse()
            .map_err(|_| ConfigError::Invalid("SESSION_RENEWAL_SECS"))?;

        let sliding_sessions = lookup("SESSION_SLIDING")
            .map(|v| v.parse::<bool>().map_err(|_| ConfigError::Invalid("SESSION_SLIDING")))
            .transpose()?
            .unwrap_or(false);

        let secure_cookies = lookup("APP_ENV").is_some_and(|env| env == "production");

        let mut auth = AuthConfig::new(&signing_secret)?
            .with_session_ttl(Duration::from_secs(session_ttl_secs))
            .with_renewal_threshold(Duration::from_secs(renewal_secs));

        if let Some(session_secret) = lookup("SESSION_SECRET").filter(|s| !s.is_empty()) {
            auth = auth.with_session_secret(&session_secret)?;
        }

        Ok(Self {
            http_port,
            auth,
            secure_cookies,
            sliding_sessions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_signing_secret_required() {
        assert_eq!(
            load(&[]).unwrap_err(),
            ConfigError::Missing("SIGNING_SECRET")
        );
        assert_eq!(
            load(&[("SIGNING_SECRET", "")]).unwrap_err(),
            ConfigError::Missing("SIGNING_SECRET")
        );
    }

    #[test]
    fn test_bot_token_alias() {
        let config = load(&[("BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(config.auth.signing_secret.expose(), b"123:abc");
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("SIGNING_SECRET", "123:abc")]).unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.auth.session_ttl, Duration::from_secs(3600));
        assert_eq!(config.auth.renewal_threshold, Duration::from_secs(600));
        assert!(!config.secure_cookies);
        assert!(!config.sliding_sessions);
        assert!(config.auth.session_secret.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("SIGNING_SECRET", "123:abc"),
            ("HTTP_PORT", "9000"),
            ("SESSION_TTL_SECS", "120"),
            ("SESSION_RENEWAL_SECS", "30"),
            ("SESSION_SLIDING", "true"),
            ("APP_ENV", "production"),
            ("SESSION_SECRET", &"s".repeat(40)),
        ])
        .unwrap();
        assert_eq!(config.http_port, 9000);
        assert_eq!(config.auth.session_ttl, Duration::from_secs(120));
        assert_eq!(config.auth.renewal_threshold, Duration::from_secs(30));
        assert!(config.sliding_sessions);
        assert!(config.secure_cookies);
        assert_eq!(config.auth.session_key_material().len(), 40);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            load(&[("SIGNING_SECRET", "x"), ("SESSION_TTL_SECS", "1h")]).unwrap_err(),
            ConfigError::Invalid("SESSION_TTL_SECS")
        );
        assert_eq!(
            load(&[("SIGNING_SECRET", "x"), ("SESSION_SLIDING", "yes")]).unwrap_err(),
            ConfigError::Invalid("SESSION_SLIDING")
        );
        assert!(matches!(
            load(&[("SIGNING_SECRET", "x"), ("SESSION_SECRET", "short")]),
            Err(ConfigError::KeyTooShort { .. })
        ));
    }
}
