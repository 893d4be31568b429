use chrono::Utc;

use crate::biometric::BiometricPolicy;
use crate::events::{dispatch, PortalEvent};
use crate::session::SessionRepository;
use crate::staff::StaffRepository;
use crate::AuthError;

/// Second step of the staff login: live samples against the blobs
/// enrolled at signup.
pub struct VerifyStaffBiometricAction<S: SessionRepository, F: StaffRepository> {
    sessions: S,
    staff: F,
    policy: BiometricPolicy,
}

impl<S: SessionRepository, F: StaffRepository> VerifyStaffBiometricAction<S, F> {
    pub fn new(sessions: S, staff: F, policy: BiometricPolicy) -> Self {
        VerifyStaffBiometricAction {
            sessions,
            staff,
            policy,
        }
    }

    pub async fn execute(
        &self,
        session_id: &str,
        face_sample: &str,
        voice_sample: &str,
    ) -> Result<(), AuthError> {
        let session = self
            .sessions
            .find(session_id)
            .await?
            .ok_or(AuthError::StaffAuthRequired)?;
        let staff_id = session
            .data
            .staff_id
            .ok_or(AuthError::StaffAuthRequired)?;

        let enrolled = self
            .staff
            .find_by_id(&staff_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !self.policy.verify(
            &enrolled.face_image,
            face_sample,
            &enrolled.voice_recording,
            voice_sample,
        ) {
            log::warn!(
                target: "medgate",
                "msg=\"staff biometric rejected\" staff_id={}",
                staff_id
            );
            return Err(AuthError::BiometricRejected);
        }

        let applied = self
            .sessions
            .update(session_id, Box::new(|data| {
                data.staff_authenticated = true;
                Ok(())
            }))
            .await?;
        if !applied {
            return Err(AuthError::StaffAuthRequired);
        }

        log::info!(
            target: "medgate",
            "msg=\"staff biometric verified\" staff_id={}",
            staff_id
        );
        dispatch(PortalEvent::StaffVerified {
            staff_id,
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecretString;
    use crate::session::SessionData;
    use crate::staff::StaffRecord;
    use crate::{InMemorySessionRepository, InMemoryStaffRepository};

    async fn enrolled_staff() -> InMemoryStaffRepository {
        let staff = InMemoryStaffRepository::new();
        staff
            .create(StaffRecord {
                staff_id: "STAFF_1".to_owned(),
                name: "Dr. Smith".to_owned(),
                email: "smith@example.com".to_owned(),
                license_number: "LIC-001".to_owned(),
                department: "Cardiology".to_owned(),
                password: SecretString::new("hunter2"),
                face_image: "face-blob".to_owned(),
                voice_recording: "voice-blob".to_owned(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        staff
    }

    async fn credentialed_session(sessions: &InMemorySessionRepository) -> String {
        let mut data = SessionData::new();
        data.staff_id = Some("STAFF_1".to_owned());
        sessions.create(data).await.unwrap()
    }

    #[tokio::test]
    async fn test_matching_samples_authenticate() {
        let sessions = InMemorySessionRepository::new();
        let session_id = credentialed_session(&sessions).await;

        let action = VerifyStaffBiometricAction::new(
            sessions.clone(),
            enrolled_staff().await,
            BiometricPolicy::default(),
        );
        action
            .execute(&session_id, "face-blob", "voice-blob")
            .await
            .unwrap();

        let session = sessions.find(&session_id).await.unwrap().unwrap();
        assert!(session.data.staff_authenticated);
    }

    #[tokio::test]
    async fn test_poor_samples_are_rejected() {
        let sessions = InMemorySessionRepository::new();
        let session_id = credentialed_session(&sessions).await;

        let action = VerifyStaffBiometricAction::new(
            sessions.clone(),
            enrolled_staff().await,
            BiometricPolicy::default(),
        );
        let result = action.execute(&session_id, "zzzz", "zzzz").await;
        assert_eq!(result.unwrap_err(), AuthError::BiometricRejected);

        let session = sessions.find(&session_id).await.unwrap().unwrap();
        assert!(!session.data.staff_authenticated);
    }

    #[tokio::test]
    async fn test_session_without_credentials_step() {
        let sessions = InMemorySessionRepository::new();
        let session_id = sessions.create(SessionData::new()).await.unwrap();

        let action = VerifyStaffBiometricAction::new(
            sessions,
            enrolled_staff().await,
            BiometricPolicy::default(),
        );
        let result = action.execute(&session_id, "face-blob", "voice-blob").await;
        assert_eq!(result.unwrap_err(), AuthError::StaffAuthRequired);
    }
}
