//! Init-data signature verification
//!
//! The platform signs init data as:
//!
//! ```text
//! secret_key = HMAC_SHA256(key = "WebAppData", message = bot_token)
//! hash       = hex(HMAC_SHA256(key = secret_key, message = data_check_string))
//! ```
//!
//! where `data_check_string` is every field except `hash`, sorted by key and
//! rendered `key=value`, one per line.

use tma_types::{Identity, Timestamp};
use tracing::debug;

use crate::config::FRESHNESS_WINDOW_SECS;
use crate::crypto::{constant_time_str_eq, HmacKey};
use crate::init_data::InitData;
use crate::VerificationError;

/// Domain-separation label for the init-data key derivation
pub const WEB_APP_DATA_LABEL: &[u8] = b"WebAppData";

/// Verified init data, including the platform's pass-through fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedInitData {
    pub identity: Identity,
    pub auth_date: Timestamp,
    pub query_id: Option<String>,
    pub start_param: Option<String>,
    pub chat_type: Option<String>,
    pub chat_instance: Option<String>,
}

/// Verifies init data against a fixed signing secret.
///
/// Stateless after construction; safe to share across threads.
#[derive(Clone)]
pub struct Verifier {
    secret_key: HmacKey,
}

impl Verifier {
    /// Create a verifier, deriving the init-data key from the signing secret once
    pub fn new(signing_secret: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: HmacKey::derive(WEB_APP_DATA_LABEL, signing_secret),
        }
    }

    /// Verify `raw` at time `now` and return the embedded identity
    pub fn verify(&self, raw: &str, now: Timestamp) -> Result<Identity, VerificationError> {
        self.verify_init_data(raw, now).map(|verified| verified.identity)
    }

    /// Verify `raw` at time `now` and return the identity with pass-through fields
    pub fn verify_init_data(
        &self,
        raw: &str,
        now: Timestamp,
    ) -> Result<VerifiedInitData, VerificationError> {
        let data = InitData::parse(raw);

        let hash = data.hash().ok_or(VerificationError::MissingHash)?;

        let auth_date: Timestamp = data
            .auth_date()
            .ok_or(VerificationError::MissingTimestamp)?
            .parse()
            .map_err(|_| VerificationError::MalformedTimestamp)?;

        // A future auth_date yields a negative age and is accepted.
        let age = now.saturating_sub(auth_date);
        if age > FRESHNESS_WINDOW_SECS {
            debug!(age, "Init data outside freshness window");
            return Err(VerificationError::Expired);
        }

        let expected = self.secret_key.sign_hex(data.data_check_string().as_bytes());
        if !constant_time_str_eq(&expected, hash) {
            debug!("Init data signature mismatch");
            return Err(VerificationError::BadSignature);
        }

        let user = data.user().ok_or(VerificationError::MissingUser)?;
        let identity: Identity =
            serde_json::from_str(user).map_err(|_| VerificationError::MalformedUser)?;

        Ok(VerifiedInitData {
            identity,
            auth_date,
            query_id: data.query_id().map(str::to_owned),
            start_param: data.start_param().map(str::to_owned),
            chat_type: data.chat_type().map(str::to_owned),
            chat_instance: data.chat_instance().map(str::to_owned),
        })
    }

    /// Compute the signature the platform would attach to these fields.
    ///
    /// Any `hash` pair in `fields` is ignored.
    pub fn sign(&self, fields: &InitData) -> String {
        self.secret_key.sign_hex(fields.data_check_string().as_bytes())
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier").finish_non_exhaustive()
    }
}

/// One-shot verification with an explicit secret
pub fn verify(
    raw: &str,
    secret: impl AsRef<[u8]>,
    now: Timestamp,
) -> Result<Identity, VerificationError> {
    Verifier::new(secret).verify(raw, now)
}
