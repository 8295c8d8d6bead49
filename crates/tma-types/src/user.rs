//! User identity types

use serde::{Deserialize, Serialize};

/// Platform-issued user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TelegramUserId(pub i64);

impl TelegramUserId {
    /// Parse a user ID from its decimal string form
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        Ok(Self(s.parse()?))
    }
}

impl std::fmt::Display for TelegramUserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TelegramUserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Verified principal, as embedded by the platform under the `user` init-data key
///
/// Unknown fields sent by the platform are ignored on parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Platform user ID
    pub id: TelegramUserId,
    /// First name (display name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Handle, without the leading `@`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// IETF language tag of the user's client
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allows_write_to_pm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl Identity {
    /// Create an identity carrying only the user ID
    pub fn new(id: impl Into<TelegramUserId>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            last_name: None,
            username: None,
            language_code: None,
            is_premium: None,
            allows_write_to_pm: None,
            photo_url: None,
        }
    }

    /// Human-readable name: full name if present, else `@username`, else the numeric ID
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name, &self.username) {
            (Some(first), Some(last), _) => format!("{first} {last}"),
            (Some(first), None, _) => first.clone(),
            (None, _, Some(username)) => format!("@{username}"),
            _ => self.id.to_string(),
        }
    }

    /// Whether the platform marked this user as premium
    pub fn is_premium(&self) -> bool {
        self.is_premium.unwrap_or(false)
    }
}
