//! Signed cookie helpers for session identifiers.
//!
//! HMAC-SHA256 over the session id makes the cookie tamper-evident; the
//! session state itself stays server-side.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::SecretString;

use super::config::{SameSite, SessionConfig};

type HmacSha256 = Hmac<Sha256>;

/// Signs a session id, producing `{session_id}.{signature}`.
pub fn sign_session_id(session_id: &str, secret: &SecretString) -> String {
    let signature = compute_hmac(session_id.as_bytes(), secret.expose_secret().as_bytes());
    format!("{}.{}", session_id, hex::encode(signature))
}

/// Verifies a signed cookie value and extracts the session id.
///
/// Returns `None` if the signature does not match.
pub fn verify_signed_cookie(cookie_value: &str, secret: &SecretString) -> Option<String> {
    let (session_id, signature_hex) = cookie_value.rsplit_once('.')?;

    let actual = hex::decode(signature_hex).ok()?;
    let expected = compute_hmac(session_id.as_bytes(), secret.expose_secret().as_bytes());

    if constant_time_eq(&expected, &actual) {
        Some(session_id.to_owned())
    } else {
        log::warn!(
            target: "medgate::session",
            "msg=\"session cookie tampered\" cookie_prefix=\"{}...\"",
            cookie_value.chars().take(8).collect::<String>()
        );
        None
    }
}

/// `Set-Cookie` value establishing the session cookie.
pub fn build_set_cookie(config: &SessionConfig, signed_value: &str) -> String {
    let mut cookie = format!(
        "{}={}; Path={}",
        config.cookie_name, signed_value, config.cookie_path
    );
    if let Some(domain) = &config.cookie_domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    if config.cookie_http_only {
        cookie.push_str("; HttpOnly");
    }
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie.push_str(match config.cookie_same_site {
        SameSite::None => "; SameSite=None",
        SameSite::Lax => "; SameSite=Lax",
        SameSite::Strict => "; SameSite=Strict",
    });
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn build_clear_cookie(config: &SessionConfig) -> String {
    format!(
        "{}=; Path={}; Max-Age=0",
        config.cookie_name, config.cookie_path
    )
}

fn compute_hmac(message: &[u8], key: &[u8]) -> Vec<u8> {
    // HMAC-SHA256 accepts keys of any length, so this cannot fail.
    #[allow(clippy::expect_used)]
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any size");
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::new("test-secret-key-that-is-long-enough")
    }

    #[test]
    fn test_sign_and_verify() {
        let signed = sign_session_id("abc123session", &secret());
        assert_eq!(
            verify_signed_cookie(&signed, &secret()),
            Some("abc123session".to_owned())
        );
    }

    #[test]
    fn test_tampered_signature() {
        let tampered = format!("abc123session.{}", "0".repeat(64));
        assert!(verify_signed_cookie(&tampered, &secret()).is_none());
    }

    #[test]
    fn test_tampered_session_id() {
        let signed = sign_session_id("abc123session", &secret());
        let signature = signed.rsplit_once('.').unwrap().1;
        let tampered = format!("other_session.{signature}");
        assert!(verify_signed_cookie(&tampered, &secret()).is_none());
    }

    #[test]
    fn test_wrong_secret() {
        let signed = sign_session_id("abc123session", &secret());
        let other = SecretString::new("a-different-secret-key-equally-long");
        assert!(verify_signed_cookie(&signed, &other).is_none());
    }

    #[test]
    fn test_malformed_cookie() {
        assert!(verify_signed_cookie("noseparator", &secret()).is_none());
        assert!(verify_signed_cookie("session.notahexsignature", &secret()).is_none());
    }

    #[test]
    fn test_set_cookie_attributes() {
        let config = SessionConfig {
            secret_key: secret(),
            ..Default::default()
        };
        let cookie = build_set_cookie(&config, "value.sig");
        assert!(cookie.starts_with("medgate_session=value.sig; Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
    }

    #[test]
    fn test_clear_cookie() {
        let config = SessionConfig::default();
        assert!(build_clear_cookie(&config).contains("Max-Age=0"));
    }
}
