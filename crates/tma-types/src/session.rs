//! Session types

use serde::{Deserialize, Serialize};

use crate::Identity;

/// Unix timestamp in whole seconds
pub type Timestamp = i64;

/// Authenticated session, carried inside the encrypted session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Verified principal
    pub identity: Identity,
    /// Issue time (Unix seconds)
    pub issued_at: Timestamp,
    /// Expiration time (Unix seconds, inclusive)
    pub expires_at: Timestamp,
}

impl Session {
    /// Create a session valid from `now` for `ttl_secs` seconds
    pub fn new(identity: Identity, now: Timestamp, ttl_secs: i64) -> Self {
        Self {
            identity,
            issued_at: now,
            expires_at: now.saturating_add(ttl_secs),
        }
    }

    /// A session is expired strictly after its expiry second
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// Seconds left before expiry (negative once expired)
    pub fn remaining(&self, now: Timestamp) -> i64 {
        self.expires_at.saturating_sub(now)
    }
}
