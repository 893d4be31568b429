//! Token generation, secret redaction, and the record payload cipher.

use std::fmt;

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::rand::{SecureRandom, SystemRandom};

use crate::AuthError;

/// Default token length in characters.
pub const DEFAULT_TOKEN_LENGTH: usize = 32;

/// A wrapper for sensitive string data that prevents accidental logging.
///
/// `Debug` and `Display` both render `[REDACTED]`; call
/// [`expose_secret`](SecretString::expose_secret) to read the value.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

/// Generates a random alphanumeric token (a-z, A-Z, 0-9).
pub fn generate_token(length: usize) -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(rng.sample(rand::distributions::Alphanumeric)))
        .collect()
}

/// AES-256-GCM cipher for opaque record payloads.
///
/// Each encryption draws a fresh random nonce which is prepended to the
/// ciphertext, so payloads are self-contained.
pub struct RecordCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl RecordCipher {
    pub fn new(key_bytes: [u8; 32]) -> Result<Self, AuthError> {
        let unbound = UnboundKey::new(&AES_256_GCM, &key_bytes)
            .map_err(|_| AuthError::ConfigError("invalid encryption key".to_owned()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Generates a random 256-bit key.
    ///
    /// A per-process key makes old ciphertexts unreadable after a restart;
    /// supply a persisted key through configuration to avoid that.
    pub fn generate_key() -> Result<[u8; 32], AuthError> {
        let mut key = [0u8; 32];
        let rng = SystemRandom::new();
        rng.fill(&mut key)
            .map_err(|_| AuthError::StoreError("random key generation failed".to_owned()))?;
        Ok(key)
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| AuthError::StoreError("nonce generation failed".to_owned()))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| AuthError::StoreError("encryption failed".to_owned()))?;

        let mut out = nonce_bytes.to_vec();
        out.extend_from_slice(&in_out);
        Ok(out)
    }

    pub fn decrypt(&self, payload: &[u8]) -> Result<Vec<u8>, AuthError> {
        if payload.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(AuthError::StoreError("ciphertext too short".to_owned()));
        }

        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
        let mut nonce_array = [0u8; NONCE_LEN];
        nonce_array.copy_from_slice(nonce_bytes);
        let nonce = Nonce::assume_unique_for_key(nonce_array);

        let mut in_out = ciphertext.to_vec();
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| AuthError::StoreError("decryption failed".to_owned()))?;

        Ok(plaintext.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_length() {
        assert_eq!(generate_token(32).len(), 32);
        assert_eq!(generate_token(48).len(), 48);
    }

    #[test]
    fn test_generate_token_unique() {
        assert_ne!(generate_token(32), generate_token(32));
    }

    #[test]
    fn test_generate_token_alphanumeric() {
        let token = generate_token(100);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_secret_string_redacted() {
        let secret = SecretString::new("hunter2");
        assert_eq!(format!("{secret:?}"), "SecretString([REDACTED])");
        assert_eq!(format!("{secret}"), "[REDACTED]");
        assert_eq!(secret.expose_secret(), "hunter2");
    }

    #[test]
    fn test_record_cipher_round_trip() {
        let key = RecordCipher::generate_key().unwrap();
        let cipher = RecordCipher::new(key).unwrap();

        let sealed = cipher.encrypt(b"Blood Type: O+").unwrap();
        assert_ne!(sealed, b"Blood Type: O+");

        let opened = cipher.decrypt(&sealed).unwrap();
        assert_eq!(opened, b"Blood Type: O+");
    }

    #[test]
    fn test_record_cipher_rejects_wrong_key() {
        let cipher_a = RecordCipher::new(RecordCipher::generate_key().unwrap()).unwrap();
        let cipher_b = RecordCipher::new(RecordCipher::generate_key().unwrap()).unwrap();

        let sealed = cipher_a.encrypt(b"confidential").unwrap();
        assert!(cipher_b.decrypt(&sealed).is_err());
    }

    #[test]
    fn test_record_cipher_rejects_truncated_payload() {
        let cipher = RecordCipher::new(RecordCipher::generate_key().unwrap()).unwrap();
        assert!(cipher.decrypt(b"short").is_err());
    }
}
