//! Time-based one-time codes over the shared patient secret.
//!
//! Thin wrapper around `totp-rs`: 6-digit SHA-1 codes with a 30-second
//! step and one step of skew, compatible with standard authenticator apps.

use totp_rs::{Algorithm, Secret, TOTP};

use crate::crypto::SecretString;
use crate::AuthError;

const ISSUER: &str = "HealthcareSecure";

#[derive(Clone)]
pub struct TotpVerifier {
    secret: Vec<u8>,
    issuer: String,
}

impl TotpVerifier {
    /// Builds a verifier from a base32-encoded shared secret.
    pub fn new(shared_secret: &SecretString) -> Result<Self, AuthError> {
        let secret = Secret::Encoded(shared_secret.expose_secret().to_owned())
            .to_bytes()
            .map_err(|_| {
                AuthError::ConfigError("shared 2FA secret is not valid base32".to_owned())
            })?;

        Ok(Self {
            secret,
            issuer: ISSUER.to_owned(),
        })
    }

    fn totp_for(&self, account: &str) -> TOTP {
        // The deployed shared secret is 80 bits, below the RFC 4226 minimum
        // that TOTP::new enforces, so the unchecked constructor is required.
        TOTP::new_unchecked(
            Algorithm::SHA1,
            6,
            1,
            30,
            self.secret.clone(),
            Some(self.issuer.clone()),
            account.to_owned(),
        )
    }

    /// otpauth:// provisioning URI for enrolling an authenticator app.
    pub fn provisioning_uri(&self, account: &str) -> String {
        self.totp_for(account).get_url()
    }

    /// Checks a 6-digit code against the current time step.
    ///
    /// Malformed codes simply fail to validate; only a clock failure is an
    /// error.
    pub fn verify(&self, code: &str) -> Result<bool, AuthError> {
        if code.len() != 6 || !code.chars().all(|c| c.is_ascii_digit()) {
            return Ok(false);
        }
        self.totp_for("")
            .check_current(code)
            .map_err(|_| AuthError::AuthFailed)
    }

    /// The code for the current time step. Test and demo helper.
    pub fn current_code(&self) -> Result<String, AuthError> {
        self.totp_for("")
            .generate_current()
            .map_err(|_| AuthError::AuthFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_2FA_SECRET;

    fn verifier() -> TotpVerifier {
        TotpVerifier::new(&SecretString::new(DEFAULT_2FA_SECRET)).unwrap()
    }

    #[test]
    fn test_rejects_invalid_base32() {
        let result = TotpVerifier::new(&SecretString::new("not base32!!"));
        assert!(result.is_err());
    }

    #[test]
    fn test_current_code_verifies() {
        let verifier = verifier();
        let code = verifier.current_code().unwrap();
        assert!(verifier.verify(&code).unwrap());
    }

    #[test]
    fn test_malformed_codes_do_not_verify() {
        let verifier = verifier();
        assert!(!verifier.verify("12345").unwrap());
        assert!(!verifier.verify("1234567").unwrap());
        assert!(!verifier.verify("12a456").unwrap());
        assert!(!verifier.verify("").unwrap());
    }

    #[test]
    fn test_wrong_code_does_not_verify() {
        let verifier = verifier();
        let code = verifier.current_code().unwrap();
        // flip the last digit
        let wrong = {
            let mut chars: Vec<char> = code.chars().collect();
            let last = chars.pop().unwrap();
            chars.push(if last == '0' { '1' } else { '0' });
            chars.into_iter().collect::<String>()
        };
        assert!(!verifier.verify(&wrong).unwrap());
    }

    #[test]
    fn test_provisioning_uri_embeds_secret_and_issuer() {
        let uri = verifier().provisioning_uri("alice@example.com");
        assert!(uri.starts_with("otpauth://totp/"));
        assert!(uri.contains(DEFAULT_2FA_SECRET));
        assert!(uri.contains("HealthcareSecure"));
    }
}
