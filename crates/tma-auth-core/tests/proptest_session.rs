//! Property-based tests for session tokens
//!
//! These tests verify:
//! - Issued tokens roundtrip to the same identity
//! - Tokens expire exactly after their expiry second
//! - Any single bit flip is detected, never yielding a different identity
//! - Malformed tokens never cause panics

use proptest::prelude::*;
use std::time::Duration;
use tma_auth_core::{AuthConfig, SessionError, SessionManager};
use tma_types::{Identity, TelegramUserId};

// ============================================================================
// Strategies
// ============================================================================

/// Generate arbitrary identities
fn arb_identity() -> impl Strategy<Value = Identity> {
    (
        any::<i64>(),
        prop::option::of("[A-Za-z \u{00e9}]{1,16}"),
        prop::option::of("[A-Za-z]{1,16}"),
        prop::option::of("[a-z0-9_]{5,32}"),
        prop::option::of("[a-z]{2}(-[A-Z]{2})?"),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(id, first_name, last_name, username, language_code, is_premium)| {
            let mut identity = Identity::new(TelegramUserId(id));
            identity.first_name = first_name;
            identity.last_name = last_name;
            identity.username = username;
            identity.language_code = language_code;
            identity.is_premium = is_premium;
            identity
        })
}

fn arb_now() -> impl Strategy<Value = i64> {
    0i64..4_000_000_000i64
}

fn arb_ttl() -> impl Strategy<Value = Duration> {
    (0u64..10_000_000u64).prop_map(Duration::from_secs)
}

/// Generate malformed token strings
fn arb_malformed_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[!@#$%^&*() ]{1,30}",
        "[A-Za-z0-9_-]{0,54}",
        ".{0,120}",
    ]
}

fn manager() -> SessionManager {
    SessionManager::new(&AuthConfig::new("123456:TEST-bot-token").unwrap())
}

// ============================================================================
// Lifecycle Properties
// ============================================================================

proptest! {
    /// Property: decode(issue(identity)) returns the identity unchanged
    #[test]
    fn prop_issue_decode_roundtrip(identity in arb_identity(), now in arb_now(), ttl in arb_ttl()) {
        let manager = manager();
        let issued = manager.issue(identity.clone(), now, ttl).unwrap();
        let decoded = manager.decode(issued.token.as_str(), now).unwrap();
        prop_assert_eq!(decoded, identity);
    }

    /// Property: valid through the expiry second, expired after it
    #[test]
    fn prop_expiry_law(
        identity in arb_identity(),
        now in arb_now(),
        ttl in arb_ttl(),
        before in 0u64..10_000_000u64,
        after in 1i64..10_000_000i64
    ) {
        let manager = manager();
        let issued = manager.issue(identity, now, ttl).unwrap();
        let expires_at = now + ttl.as_secs() as i64;
        prop_assert_eq!(issued.expires_at, expires_at);

        let within = now + (before % (ttl.as_secs() + 1)) as i64;
        prop_assert!(manager.decode(issued.token.as_str(), within).is_ok());

        prop_assert_eq!(
            manager.decode(issued.token.as_str(), expires_at + after),
            Err(SessionError::Expired)
        );
    }

    /// Property: two issues for the same identity never share a token
    #[test]
    fn prop_tokens_unique(identity in arb_identity(), now in arb_now()) {
        let manager = manager();
        let ttl = Duration::from_secs(3600);
        let a = manager.issue(identity.clone(), now, ttl).unwrap();
        let b = manager.issue(identity, now, ttl).unwrap();
        prop_assert_ne!(a.token, b.token);
    }
}

// ============================================================================
// Tamper Properties
// ============================================================================

proptest! {
    /// Property: flipping any single bit of a token is rejected
    #[test]
    fn prop_bit_flip_rejected(
        identity in arb_identity(),
        position in any::<prop::sample::Index>(),
        bit in 0u8..8u8
    ) {
        let manager = manager();
        let issued = manager.issue(identity, 1000, Duration::from_secs(3600)).unwrap();

        let mut bytes = issued.token.as_str().as_bytes().to_vec();
        let i = position.index(bytes.len());
        bytes[i] ^= 1 << bit;

        if let Ok(tampered) = String::from_utf8(bytes) {
            let result = manager.decode(&tampered, 1000);
            prop_assert!(
                matches!(result, Err(SessionError::Tampered) | Err(SessionError::Malformed)),
                "bit flip at {} accepted: {:?}", i, result
            );
        }
    }

    /// Property: a token from another key is always tampered
    #[test]
    fn prop_foreign_key_rejected(identity in arb_identity(), other in "[A-Za-z0-9]{8,40}") {
        prop_assume!(other != "123456:TEST-bot-token");
        let issued = manager().issue(identity, 1000, Duration::from_secs(3600)).unwrap();
        let foreign = SessionManager::new(&AuthConfig::new(&other).unwrap());
        prop_assert_eq!(
            foreign.decode(issued.token.as_str(), 1000),
            Err(SessionError::Tampered)
        );
    }

    /// Property: malformed tokens never panic and never decode
    #[test]
    fn prop_malformed_token_never_panics(token in arb_malformed_token(), now in any::<i64>()) {
        prop_assert!(manager().decode(&token, now).is_err());
    }
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[test]
fn test_scenario_issue_decode_expire() {
    let manager = manager();
    let issued = manager
        .issue(Identity::new(42), 1000, Duration::from_secs(3600))
        .unwrap();
    assert_eq!(
        manager.decode(issued.token.as_str(), 1000).unwrap(),
        Identity::new(42)
    );
    assert_eq!(
        manager.decode(issued.token.as_str(), 5000),
        Err(SessionError::Expired)
    );
}

#[test]
fn test_huge_ttl_saturates() {
    let manager = manager();
    let issued = manager
        .issue(Identity::new(1), 1000, Duration::from_secs(u64::MAX))
        .unwrap();
    assert_eq!(issued.expires_at, i64::MAX);
    assert!(manager.decode(issued.token.as_str(), i64::MAX).is_ok());
}
