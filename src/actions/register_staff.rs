use chrono::Utc;

use crate::crypto::generate_token;
use crate::events::{dispatch, PortalEvent};
use crate::staff::{NewStaff, StaffRecord, StaffRepository};
use crate::AuthError;

/// Registers a staff member with their enrolled biometric blobs.
pub struct RegisterStaffAction<F: StaffRepository> {
    staff: F,
}

impl<F: StaffRepository> RegisterStaffAction<F> {
    pub fn new(staff: F) -> Self {
        RegisterStaffAction { staff }
    }

    pub async fn execute(&self, new_staff: NewStaff) -> Result<StaffRecord, AuthError> {
        validate(&new_staff)?;

        // Timestamp alone collides for same-second signups; the random
        // suffix keeps ids unique.
        let staff_id = format!("STAFF_{}_{}", Utc::now().timestamp(), generate_token(6));

        let record = StaffRecord {
            staff_id: staff_id.clone(),
            name: new_staff.name,
            email: new_staff.email,
            license_number: new_staff.license_number,
            department: new_staff.department,
            password: new_staff.password,
            face_image: new_staff.face_image,
            voice_recording: new_staff.voice_recording,
            created_at: Utc::now(),
        };
        self.staff.create(record.clone()).await?;

        log::info!(
            target: "medgate",
            "msg=\"staff registered\" staff_id={} email={}",
            record.staff_id,
            record.email
        );
        dispatch(PortalEvent::StaffRegistered {
            staff_id,
            email: record.email.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(record)
    }
}

fn validate(new_staff: &NewStaff) -> Result<(), AuthError> {
    if new_staff.name.trim().is_empty() {
        return Err(AuthError::Validation("name is required".to_owned()));
    }
    if !new_staff.email.contains('@') {
        return Err(AuthError::Validation("invalid email address".to_owned()));
    }
    if new_staff.password.is_empty() {
        return Err(AuthError::Validation("password is required".to_owned()));
    }
    if new_staff.face_image.is_empty() || new_staff.voice_recording.is_empty() {
        return Err(AuthError::Validation(
            "face and voice enrollment are required".to_owned(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::SecretString;
    use crate::InMemoryStaffRepository;

    fn signup(email: &str) -> NewStaff {
        NewStaff {
            name: "Dr. Smith".to_owned(),
            email: email.to_owned(),
            license_number: "LIC-001".to_owned(),
            department: "Cardiology".to_owned(),
            password: SecretString::new("plaintext"),
            face_image: "face-blob".to_owned(),
            voice_recording: "voice-blob".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_register_assigns_id() {
        let staff = InMemoryStaffRepository::new();
        let action = RegisterStaffAction::new(staff.clone());

        let record = action.execute(signup("smith@example.com")).await.unwrap();
        assert!(record.staff_id.starts_with("STAFF_"));

        let found = staff.find_by_id(&record.staff_id).await.unwrap();
        assert_eq!(found.unwrap().email, "smith@example.com");
    }

    #[tokio::test]
    async fn test_ids_are_unique_within_one_second() {
        let action = RegisterStaffAction::new(InMemoryStaffRepository::new());

        let a = action.execute(signup("a@example.com")).await.unwrap();
        let b = action.execute(signup("b@example.com")).await.unwrap();
        assert_ne!(a.staff_id, b.staff_id);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let action = RegisterStaffAction::new(InMemoryStaffRepository::new());
        action.execute(signup("smith@example.com")).await.unwrap();

        let result = action.execute(signup("smith@example.com")).await;
        assert_eq!(result.unwrap_err(), AuthError::EmailAlreadyRegistered);
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let action = RegisterStaffAction::new(InMemoryStaffRepository::new());
        let result = action.execute(signup("not-an-email")).await;
        assert!(matches!(result.unwrap_err(), AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_enrollment_is_rejected() {
        let action = RegisterStaffAction::new(InMemoryStaffRepository::new());

        let mut incomplete = signup("smith@example.com");
        incomplete.face_image.clear();

        let result = action.execute(incomplete).await;
        assert!(matches!(result.unwrap_err(), AuthError::Validation(_)));
    }
}
