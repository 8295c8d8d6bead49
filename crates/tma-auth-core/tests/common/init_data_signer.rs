//! Independent init-data signer mirroring what the platform does.
//!
//! Built directly on `hmac`/`sha2` so tests check the verifier against the
//! wire contract rather than against itself.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs init-data fields with a bot token
pub struct PlatformSigner {
    secret_key: Vec<u8>,
}

impl PlatformSigner {
    pub fn new(bot_token: &str) -> Self {
        let mut mac = HmacSha256::new_from_slice(b"WebAppData").unwrap();
        mac.update(bot_token.as_bytes());
        Self {
            secret_key: mac.finalize().into_bytes().to_vec(),
        }
    }

    /// Hex signature over the unencoded fields
    pub fn hash(&self, fields: &[(String, String)]) -> String {
        let mut sorted: Vec<&(String, String)> = fields.iter().collect();
        sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        let data_check_string = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut mac = HmacSha256::new_from_slice(&self.secret_key).unwrap();
        mac.update(data_check_string.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Url-encoded payload with `hash` appended, fields in the given order
    pub fn payload(&self, fields: &[(String, String)]) -> String {
        let hash = self.hash(fields);
        let mut parts: Vec<String> = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        parts.push(format!("hash={hash}"));
        parts.join("&")
    }
}

/// Sign a payload carrying `auth_date`, a `user` object with `user_id`, and extra fields
pub fn sign_init_data(
    bot_token: &str,
    auth_date: i64,
    user_id: i64,
    extra: &[(&str, &str)],
) -> String {
    let mut fields = vec![
        ("auth_date".to_string(), auth_date.to_string()),
        ("user".to_string(), format!(r#"{{"id":{user_id}}}"#)),
    ];
    fields.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    PlatformSigner::new(bot_token).payload(&fields)
}
