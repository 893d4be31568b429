//! Startup configuration for the portal backend.
//!
//! `GateConfig` holds the core policy knobs; `PortalConfig` loads the
//! externally supplied secrets from the environment and fails fast when
//! the identity-provider credentials are missing.

use chrono::Duration;

use crate::crypto::SecretString;
use crate::AuthError;

/// Default shared TOTP secret for demo deployments.
pub const DEFAULT_2FA_SECRET: &str = "JBSWY3DPEHPK3PXP";

/// Policy knobs for the gating core.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Lifetime of a single-use access token. Default: 10 seconds.
    pub access_token_ttl: Duration,

    /// Width of a challenge rotation window in seconds. Default: 120.
    pub challenge_window_secs: i64,

    /// Minimum per-channel similarity for biometric acceptance. Default
    /// 0.6, applied to face AND voice independently.
    pub biometric_threshold: f64,

    /// Automatic session expiry. `None` means sessions live until explicit
    /// logout.
    pub session_lifetime: Option<Duration>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            access_token_ttl: Duration::seconds(10),
            challenge_window_secs: 120,
            biometric_threshold: 0.6,
            session_lifetime: None,
        }
    }
}

/// Externally supplied configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
    pub session_secret: SecretString,
    pub totp_secret: SecretString,
    /// Persisted record encryption key. When absent a fresh key is
    /// generated per process and previously stored ciphertexts become
    /// unreadable after a restart.
    pub encryption_key: Option<[u8; 32]>,
    pub gate: GateConfig,
}

impl PortalConfig {
    /// Loads configuration from the environment (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the identity-provider credentials or the
    /// session signing secret are absent, or when `ENCRYPTION_KEY` is not
    /// 64 hex characters.
    pub fn from_env() -> Result<Self, AuthError> {
        dotenvy::dotenv().ok();

        let client_id = require_env("GOOGLE_CLIENT_ID")?;
        let client_secret = SecretString::new(require_env("GOOGLE_CLIENT_SECRET")?);
        let session_secret = SecretString::new(require_env("SESSION_SECRET")?);

        let redirect_uri = std::env::var("REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:8000/auth/callback".to_owned());
        let totp_secret = SecretString::new(
            std::env::var("SHARED_2FA_SECRET").unwrap_or_else(|_| DEFAULT_2FA_SECRET.to_owned()),
        );

        let encryption_key = match std::env::var("ENCRYPTION_KEY") {
            Ok(raw) => Some(parse_key(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            session_secret,
            totp_secret,
            encryption_key,
            gate: GateConfig::default(),
        })
    }
}

fn require_env(name: &str) -> Result<String, AuthError> {
    std::env::var(name)
        .map_err(|_| AuthError::ConfigError(format!("{name} must be set")))
        .and_then(|v| {
            if v.is_empty() {
                Err(AuthError::ConfigError(format!("{name} must not be empty")))
            } else {
                Ok(v)
            }
        })
}

fn parse_key(raw: &str) -> Result<[u8; 32], AuthError> {
    let bytes = hex::decode(raw)
        .map_err(|_| AuthError::ConfigError("ENCRYPTION_KEY must be hex".to_owned()))?;
    let key: [u8; 32] = bytes
        .try_into()
        .map_err(|_| AuthError::ConfigError("ENCRYPTION_KEY must be 32 bytes".to_owned()))?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gate_config() {
        let config = GateConfig::default();
        assert_eq!(config.access_token_ttl, Duration::seconds(10));
        assert_eq!(config.challenge_window_secs, 120);
        assert!((config.biometric_threshold - 0.6).abs() < f64::EPSILON);
        assert!(config.session_lifetime.is_none());
    }

    #[test]
    fn test_parse_key_valid() {
        let key = parse_key(&"ab".repeat(32)).unwrap();
        assert_eq!(key, [0xab; 32]);
    }

    #[test]
    fn test_parse_key_rejects_bad_input() {
        assert!(parse_key("nothex").is_err());
        assert!(parse_key(&"ab".repeat(16)).is_err());
    }
}
