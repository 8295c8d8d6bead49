//! Init-data payload parsing and data-check string construction

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Reserved key carrying the hex signature
pub const HASH_KEY: &str = "hash";
/// Reserved key carrying the Unix auth timestamp
pub const AUTH_DATE_KEY: &str = "auth_date";
/// Reserved key carrying the JSON user object
pub const USER_KEY: &str = "user";

/// Parsed init-data payload.
///
/// Keys are held in byte order, which is also the order the data-check
/// string requires. A repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitData {
    fields: BTreeMap<String, String>,
}

impl InitData {
    /// Parse an `application/x-www-form-urlencoded` payload
    pub fn parse(raw: &str) -> Self {
        let fields = raw
            .split('&')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => (decode_component(key), decode_component(value)),
                None => (decode_component(segment), String::new()),
            })
            .collect();
        Self { fields }
    }

    /// Raw value for `key`; empty values count as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Supplied signature
    pub fn hash(&self) -> Option<&str> {
        self.get(HASH_KEY)
    }

    /// Unparsed `auth_date`
    pub fn auth_date(&self) -> Option<&str> {
        self.get(AUTH_DATE_KEY)
    }

    /// Unparsed `user` JSON
    pub fn user(&self) -> Option<&str> {
        self.get(USER_KEY)
    }

    pub fn query_id(&self) -> Option<&str> {
        self.get("query_id")
    }

    /// Deep-link parameter the Mini App was opened with
    pub fn start_param(&self) -> Option<&str> {
        self.get("start_param")
    }

    pub fn chat_type(&self) -> Option<&str> {
        self.get("chat_type")
    }

    pub fn chat_instance(&self) -> Option<&str> {
        self.get("chat_instance")
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the signing input: every field except `hash`, sorted by key,
    /// as `key=value` lines joined by `\n` with no trailing newline.
    pub fn data_check_string(&self) -> String {
        self.fields
            .iter()
            .filter(|(key, _)| key.as_str() != HASH_KEY)
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Decode one form component: `+` is a space, then percent escapes.
/// Byte sequences that are not UTF-8 become U+FFFD, as browsers do.
fn decode_component(component: &str) -> String {
    let spaced: Cow<'_, str> = if component.contains('+') {
        Cow::Owned(component.replace('+', " "))
    } else {
        Cow::Borrowed(component)
    };
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}
