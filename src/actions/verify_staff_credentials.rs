use crate::session::{SessionData, SessionRepository};
use crate::staff::{StaffRecord, StaffRepository};
use crate::AuthError;

/// First step of the staff login: email/password check.
///
/// Success pins the staff id to the session; the biometric step then
/// finishes authentication. Unknown emails and wrong passwords produce
/// the same error.
pub struct VerifyStaffCredentialsAction<S: SessionRepository, F: StaffRepository> {
    sessions: S,
    staff: F,
}

impl<S: SessionRepository, F: StaffRepository> VerifyStaffCredentialsAction<S, F> {
    pub fn new(sessions: S, staff: F) -> Self {
        VerifyStaffCredentialsAction { sessions, staff }
    }

    pub async fn execute(
        &self,
        session_id: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<(String, StaffRecord), AuthError> {
        let record = self
            .staff
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Clear-text comparison; passwords are stored unhashed (known defect).
        if record.password.expose_secret() != password {
            log::warn!(
                target: "medgate",
                "msg=\"staff credential check failed\" email={}",
                email
            );
            return Err(AuthError::InvalidCredentials);
        }

        let staff_id = record.staff_id.clone();
        let session_id = match session_id {
            Some(id) => {
                let pinned = staff_id.clone();
                let applied = self
                    .sessions
                    .update(id, Box::new(move |data| {
                        data.staff_id = Some(pinned);
                        data.staff_authenticated = false;
                        Ok(())
                    }))
                    .await?;
                if applied {
                    id.to_owned()
                } else {
                    self.fresh_session(&staff_id).await?
                }
            }
            None => self.fresh_session(&staff_id).await?,
        };

        log::info!(
            target: "medgate",
            "msg=\"staff credentials verified\" staff_id={}",
            staff_id
        );
        Ok((session_id, record))
    }

    async fn fresh_session(&self, staff_id: &str) -> Result<String, AuthError> {
        let mut data = SessionData::new();
        data.staff_id = Some(staff_id.to_owned());
        self.sessions.create(data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecretString;
    use crate::{InMemorySessionRepository, InMemoryStaffRepository};
    use chrono::Utc;

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

    #[tokio::test]
    async fn test_valid_credentials_create_session() {
        let sessions = InMemorySessionRepository::new();
        let action = VerifyStaffCredentialsAction::new(sessions.clone(), enrolled_staff().await);

        let (session_id, record) = action
            .execute(None, "smith@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(record.staff_id, "STAFF_1");

        let session = sessions.find(&session_id).await.unwrap().unwrap();
        assert_eq!(session.data.staff_id.as_deref(), Some("STAFF_1"));
        assert!(!session.data.staff_authenticated);
    }

    #[tokio::test]
    async fn test_existing_session_is_reused() {
        let sessions = InMemorySessionRepository::new();
        let existing = sessions.create(SessionData::new()).await.unwrap();

        let action = VerifyStaffCredentialsAction::new(sessions.clone(), enrolled_staff().await);
        let (session_id, _) = action
            .execute(Some(&existing), "smith@example.com", "hunter2")
            .await
            .unwrap();
        assert_eq!(session_id, existing);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_alike() {
        let sessions = InMemorySessionRepository::new();
        let action = VerifyStaffCredentialsAction::new(sessions, enrolled_staff().await);

        let wrong_password = action
            .execute(None, "smith@example.com", "wrong")
            .await
            .unwrap_err();
        let unknown_email = action
            .execute(None, "nobody@example.com", "hunter2")
            .await
            .unwrap_err();

        assert_eq!(wrong_password, AuthError::InvalidCredentials);
        assert_eq!(unknown_email, AuthError::InvalidCredentials);
    }
}
