use chrono::Utc;

use crate::biometric::BiometricPolicy;
use crate::events::{dispatch, PortalEvent};
use crate::session::{Role, SessionRepository};
use crate::staff::StaffRepository;
use crate::{gate, AuthError};

/// The admin second factor: live face and voice samples are compared
/// against the staff member's enrolled blobs, and the spoken phrase must
/// be the exact challenge pinned to the session.
pub struct VerifyAdminBiometricAction<S: SessionRepository, F: StaffRepository> {
    sessions: S,
    staff: F,
    policy: BiometricPolicy,
}

impl<S: SessionRepository, F: StaffRepository> VerifyAdminBiometricAction<S, F> {
    pub fn new(sessions: S, staff: F, policy: BiometricPolicy) -> Self {
        VerifyAdminBiometricAction {
            sessions,
            staff,
            policy,
        }
    }

    pub async fn execute(
        &self,
        session_id: &str,
        email: &str,
        face_sample: &str,
        voice_sample: &str,
        spoken_phrase: &str,
    ) -> Result<(), AuthError> {
        let session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or(AuthError::LoginRequired)?;
        gate::check_role(&session.data, Role::Admin)?;

        // No pinned challenge means the client skipped the challenge step.
        let challenge = session
            .data
            .current_challenge
            .as_deref()
            .ok_or(AuthError::BiometricRejected)?;

        let enrolled = self
            .staff
            .find_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;

        let accepted = self.policy.verify(
            &enrolled.face_image,
            face_sample,
            &enrolled.voice_recording,
            voice_sample,
        ) && spoken_phrase == challenge;

        if !accepted {
            log::warn!(
                target: "medgate",
                "msg=\"admin biometric rejected\" identity={}",
                email
            );
            return Err(AuthError::BiometricRejected);
        }

        let applied = self
            .sessions
            .update(session_id, Box::new(gate::mark_admin_verified))
            .await?;
        if !applied {
            return Err(AuthError::LoginRequired);
        }

        let identity = session.data.identity.unwrap_or_default();
        log::info!(
            target: "medgate",
            "msg=\"admin biometric verified\" identity={}",
            identity
        );
        dispatch(PortalEvent::AdminVerified {
            identity,
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}
