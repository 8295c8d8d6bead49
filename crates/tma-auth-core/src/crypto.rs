//! Cryptographic utilities for secure operations
//!
//! This module provides the keyed-hash and AEAD primitives behind init-data
//! verification and session tokens. Comparisons of secret-derived values go
//! through [`constant_time_eq`].

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    XChaCha20Poly1305, XNonce,
};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// HMAC-SHA256 output length in bytes
pub const MAC_LENGTH: usize = 32;

/// XChaCha20 nonce length in bytes
pub const NONCE_LENGTH: usize = 24;

/// Pre-computed HMAC key for efficient repeated signing operations.
#[derive(Clone)]
pub struct HmacKey {
    key_bytes: Arc<[u8]>,
}

impl HmacKey {
    /// Create a new HMAC key from bytes. HMAC accepts keys of any length.
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key_bytes: Arc::from(key.as_ref()),
        }
    }

    /// Derive a key as `HMAC-SHA256(key = label, message = secret)`.
    ///
    /// The label domain-separates keys derived from the same secret.
    pub fn derive(label: &[u8], secret: impl AsRef<[u8]>) -> Self {
        Self::new(Self::new(label).sign(secret.as_ref()))
    }

    /// Create HMAC instance for signing
    pub fn create_hmac(&self) -> Hmac<Sha256> {
        <Hmac<Sha256> as Mac>::new_from_slice(&self.key_bytes)
            .expect("HMAC accepts keys of any length")
    }

    /// Sign data and return the MAC bytes
    pub fn sign(&self, data: &[u8]) -> [u8; MAC_LENGTH] {
        let mut mac = self.create_hmac();
        mac.update(data);
        mac.finalize().into_bytes().into()
    }

    /// Sign data and return the lowercase hex MAC
    pub fn sign_hex(&self, data: &[u8]) -> String {
        hex::encode(self.sign(data))
    }

    /// Verify a signature in constant time
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        let expected = self.sign(data);
        constant_time_eq(&expected, signature)
    }
}

impl std::fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacKey")
            .field("key_length", &self.key_bytes.len())
            .finish_non_exhaustive()
    }
}

/// Constant-time byte slice comparison.
///
/// Length is not treated as secret: slices of different length compare
/// unequal immediately. Equal-length slices are compared without
/// data-dependent branching.
#[inline]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Constant-time string comparison.
#[inline]
pub fn constant_time_str_eq(a: &str, b: &str) -> bool {
    constant_time_eq(a.as_bytes(), b.as_bytes())
}

/// 256-bit symmetric key for session tokens. Wiped on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SessionKey([u8; 32]);

impl SessionKey {
    /// Domain-separation label for the session key derivation
    pub const LABEL: &'static [u8] = b"TmaSessionKey";

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Derive the session key from a server secret.
    pub fn derive(secret: impl AsRef<[u8]>) -> Self {
        Self(HmacKey::new(Self::LABEL).sign(secret.as_ref()))
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// AEAD failures. Deliberately carries no detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CryptoError {
    #[error("encryption failed")]
    EncryptionFailed,
    #[error("decryption failed")]
    DecryptionFailed,
}

/// Encrypt with XChaCha20-Poly1305 under a fresh random nonce.
///
/// Returns (nonce, ciphertext with appended tag).
pub fn seal(
    key: &SessionKey,
    aad: &[u8],
    plaintext: &[u8],
) -> Result<([u8; NONCE_LENGTH], Vec<u8>), CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    let mut nonce = [0u8; NONCE_LENGTH];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(
            XNonce::from_slice(&nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|_| CryptoError::EncryptionFailed)?;

    Ok((nonce, ciphertext))
}

/// Decrypt and authenticate with XChaCha20-Poly1305.
pub fn open(
    key: &SessionKey,
    aad: &[u8],
    nonce: &[u8; NONCE_LENGTH],
    ciphertext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().into());

    cipher
        .decrypt(
            XNonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| CryptoError::DecryptionFailed)
}
