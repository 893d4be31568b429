use chrono::Utc;

use crate::events::{dispatch, PortalEvent};
use crate::session::{Role, SessionRepository};
use crate::totp::TotpVerifier;
use crate::{gate, AuthError};

/// The patient second factor: a 6-digit time-based code.
pub struct VerifyTotpAction<S: SessionRepository> {
    sessions: S,
    verifier: TotpVerifier,
}

impl<S: SessionRepository> VerifyTotpAction<S> {
    pub fn new(sessions: S, verifier: TotpVerifier) -> Self {
        VerifyTotpAction { sessions, verifier }
    }

    pub async fn execute(&self, session_id: &str, code: &str) -> Result<(), AuthError> {
        let session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or(AuthError::LoginRequired)?;
        gate::check_role(&session.data, Role::Patient)?;

        if !self.verifier.verify(code)? {
            return Err(AuthError::InvalidCode);
        }

        let applied = self
            .sessions
            .update(session_id, Box::new(gate::mark_patient_verified))
            .await?;
        if !applied {
            return Err(AuthError::LoginRequired);
        }

        let identity = session.data.identity.unwrap_or_default();
        log::info!(
            target: "medgate",
            "msg=\"2fa verified\" identity={}",
            identity
        );
        dispatch(PortalEvent::TwoFactorVerified {
            identity,
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}
