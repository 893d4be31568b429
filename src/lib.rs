pub mod actions;
pub mod api;
pub mod biometric;
pub mod challenge;
pub mod chatbot;
pub mod config;
pub mod crypto;
pub mod events;
pub mod gate;
pub mod identity;
pub mod ledger;
pub mod records;
pub mod session;
pub mod staff;
pub mod totp;

pub use biometric::{similarity, BiometricPolicy};
pub use challenge::{Challenge, ChallengeGenerator};
pub use config::{GateConfig, PortalConfig};
pub use crypto::{generate_token, RecordCipher, SecretString};
pub use identity::{IdentityClaims, IdentityProvider, MockIdentityProvider};
pub use ledger::{AccessToken, InMemoryTokenLedger, TokenLedger};
pub use records::{InMemoryRecordStore, RecordStore};
pub use session::{
    InMemorySessionRepository, Role, Session, SessionConfig, SessionData, SessionRepository,
};
pub use staff::{InMemoryStaffRepository, NewStaff, StaffRecord, StaffRepository};
pub use totp::TotpVerifier;

use std::fmt;

/// Errors produced by the session gate and its collaborators.
///
/// Token and challenge expiry are not errors; they surface as a normal
/// denied outcome from the owning component.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// Role is not one of `admin` / `patient`.
    InvalidRole,
    /// One-time code did not validate.
    InvalidCode,
    /// Staff email/password pair did not match.
    InvalidCredentials,
    /// Malformed or out-of-range input.
    Validation(String),
    /// Staff signup with an email that is already registered.
    EmailAlreadyRegistered,
    /// No identity on the session.
    LoginRequired,
    /// Staff-only endpoint called without a verified staff session.
    StaffAuthRequired,
    /// Role-scoped endpoint called with a different (or no) role.
    RoleMismatch,
    /// Role cannot change after second-factor verification without logout.
    RoleLocked,
    /// Admin role selected but the biometric gate has not passed.
    BiometricRequired,
    /// Patient role selected but no valid one-time code has been presented.
    TwoFactorRequired,
    /// Biometric channels or spoken challenge did not match.
    BiometricRejected,
    /// Unknown record or staff id.
    NotFound,
    /// Opaque failure from an external provider (identity exchange, recognizer).
    AuthFailed,
    /// Storage failure (poisoned lock, corrupt payload).
    StoreError(String),
    /// Missing or malformed startup configuration.
    ConfigError(String),
}

impl std::error::Error for AuthError {}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidRole => write!(f, "Invalid role selection"),
            AuthError::InvalidCode => write!(f, "Invalid 2FA code"),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            AuthError::EmailAlreadyRegistered => write!(f, "Email already registered"),
            AuthError::LoginRequired => write!(f, "Login required"),
            AuthError::StaffAuthRequired => write!(f, "Not authenticated"),
            AuthError::RoleMismatch => write!(f, "Unauthorized role"),
            AuthError::RoleLocked => {
                write!(f, "Role is locked after verification; log out first")
            }
            AuthError::BiometricRequired => {
                write!(f, "Biometric verification required for Admins")
            }
            AuthError::TwoFactorRequired => write!(f, "2FA required for Patients"),
            AuthError::BiometricRejected => write!(f, "Biometric Verification Failed"),
            AuthError::NotFound => write!(f, "Not found"),
            AuthError::AuthFailed => write!(f, "Auth failed"),
            AuthError::StoreError(msg) => write!(f, "Store error: {}", msg),
            AuthError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}
