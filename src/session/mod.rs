mod config;
mod cookie;
mod memory_store;
mod repository;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use config::{SameSite, SessionConfig};
pub use cookie::{build_clear_cookie, build_set_cookie, sign_session_id, verify_signed_cookie};
pub use memory_store::InMemorySessionRepository;
pub use repository::{SessionRepository, SessionUpdate};

use crate::AuthError;

/// Portal roles that select the second-factor path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Patient => "patient",
        }
    }

    /// Parses a client-supplied role; anything outside the fixed enum is
    /// rejected without a transition.
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        match raw {
            "admin" => Ok(Role::Admin),
            "patient" => Ok(Role::Patient),
            _ => Err(AuthError::InvalidRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session authentication progress.
///
/// Invariant: `admin_verified`/`patient_verified` may only be true while
/// `identity` is set and `role` matches; the transition helpers in
/// [`crate::gate`] are the only writers that uphold it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub identity: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub admin_verified: bool,
    pub patient_verified: bool,
    pub current_challenge: Option<String>,
    pub staff_id: Option<String>,
    pub staff_authenticated: bool,
    pub created_at: DateTime<Utc>,
    /// `None`: the session lives until explicit logout.
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionData {
    /// A fresh, unauthenticated session.
    pub fn new() -> Self {
        Self {
            identity: None,
            display_name: None,
            role: None,
            admin_verified: false,
            patient_verified: false,
            current_challenge: None,
            staff_id: None,
            staff_authenticated: false,
            created_at: Utc::now(),
            expires_at: None,
        }
    }
}

impl Default for SessionData {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub data: SessionData,
}

impl Session {
    pub fn new(id: String, data: SessionData) -> Self {
        Self { id, data }
    }

    pub fn is_expired(&self) -> bool {
        match self.data.expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("patient").unwrap(), Role::Patient);
        assert_eq!(Role::parse("doctor"), Err(AuthError::InvalidRole));
        assert_eq!(Role::parse("ADMIN"), Err(AuthError::InvalidRole));
    }

    #[test]
    fn test_fresh_session_is_unauthenticated() {
        let data = SessionData::new();
        assert!(data.identity.is_none());
        assert!(data.role.is_none());
        assert!(!data.admin_verified);
        assert!(!data.patient_verified);
    }

    #[test]
    fn test_session_without_lifetime_never_expires() {
        let session = Session::new("s1".to_owned(), SessionData::new());
        assert!(!session.is_expired());
    }

    #[test]
    fn test_session_expiry_when_configured() {
        let mut data = SessionData::new();
        data.expires_at = Some(Utc::now() - Duration::minutes(1));
        assert!(Session::new("s1".to_owned(), data).is_expired());
    }
}
