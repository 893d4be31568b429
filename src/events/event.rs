use chrono::{DateTime, Utc};

use crate::session::Role;

/// Events emitted by portal actions.
///
/// Fired unconditionally; if no listeners are registered they are
/// silently dropped. `RecordAccessed` carries the full audit tuple for
/// every successful record read.
#[derive(Debug, Clone)]
pub enum PortalEvent {
    // session lifecycle
    IdentityEstablished {
        session_id: String,
        identity: String,
        at: DateTime<Utc>,
    },
    RoleSelected {
        identity: String,
        role: Role,
        at: DateTime<Utc>,
    },
    LoggedOut {
        session_id: String,
        at: DateTime<Utc>,
    },

    // second factors
    ChallengeIssued {
        identity: String,
        phrase: String,
        at: DateTime<Utc>,
    },
    AdminVerified {
        identity: String,
        at: DateTime<Utc>,
    },
    TwoFactorVerified {
        identity: String,
        at: DateTime<Utc>,
    },

    // record access audit trail
    RecordAccessed {
        identity: String,
        role: Role,
        record_id: String,
        at: DateTime<Utc>,
    },

    // staff lifecycle
    StaffRegistered {
        staff_id: String,
        email: String,
        at: DateTime<Utc>,
    },
    StaffVerified {
        staff_id: String,
        at: DateTime<Utc>,
    },
}

impl PortalEvent {
    /// Returns a dot-separated event name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IdentityEstablished { .. } => "session.identity_established",
            Self::RoleSelected { .. } => "session.role_selected",
            Self::LoggedOut { .. } => "session.logged_out",
            Self::ChallengeIssued { .. } => "gate.challenge_issued",
            Self::AdminVerified { .. } => "gate.admin_verified",
            Self::TwoFactorVerified { .. } => "gate.two_factor_verified",
            Self::RecordAccessed { .. } => "records.accessed",
            Self::StaffRegistered { .. } => "staff.registered",
            Self::StaffVerified { .. } => "staff.verified",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::IdentityEstablished { at, .. }
            | Self::RoleSelected { at, .. }
            | Self::LoggedOut { at, .. }
            | Self::ChallengeIssued { at, .. }
            | Self::AdminVerified { at, .. }
            | Self::TwoFactorVerified { at, .. }
            | Self::RecordAccessed { at, .. }
            | Self::StaffRegistered { at, .. }
            | Self::StaffVerified { at, .. } => *at,
        }
    }
}
