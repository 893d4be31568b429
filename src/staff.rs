//! Medical staff records and their repository.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::crypto::SecretString;
use crate::AuthError;

/// A registered staff member with enrolled biometric blobs.
#[derive(Debug, Clone)]
pub struct StaffRecord {
    pub staff_id: String,
    pub name: String,
    pub email: String,
    pub license_number: String,
    pub department: String,
    /// Stored in clear. A known defect: real deployments must replace
    /// this with salted hashing.
    pub password: SecretString,
    /// Base64-encoded enrolled face image.
    pub face_image: String,
    /// Base64-encoded enrolled voice recording.
    pub voice_recording: String,
    pub created_at: DateTime<Utc>,
}

/// Signup payload before an id is assigned.
#[derive(Debug, Clone)]
pub struct NewStaff {
    pub name: String,
    pub email: String,
    pub license_number: String,
    pub department: String,
    pub password: SecretString,
    pub face_image: String,
    pub voice_recording: String,
}

#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Stores a record; emails are unique, enforced atomically.
    async fn create(&self, record: StaffRecord) -> Result<(), AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<StaffRecord>, AuthError>;

    async fn find_by_id(&self, staff_id: &str) -> Result<Option<StaffRecord>, AuthError>;
}

#[derive(Clone)]
pub struct InMemoryStaffRepository {
    staff: Arc<RwLock<HashMap<String, StaffRecord>>>,
}

impl InMemoryStaffRepository {
    pub fn new() -> Self {
        Self {
            staff: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStaffRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StaffRepository for InMemoryStaffRepository {
    async fn create(&self, record: StaffRecord) -> Result<(), AuthError> {
        let mut staff = self
            .staff
            .write()
            .map_err(|_| AuthError::StoreError("staff lock poisoned".to_owned()))?;

        if staff.values().any(|existing| existing.email == record.email) {
            return Err(AuthError::EmailAlreadyRegistered);
        }

        staff.insert(record.staff_id.clone(), record);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StaffRecord>, AuthError> {
        let staff = self
            .staff
            .read()
            .map_err(|_| AuthError::StoreError("staff lock poisoned".to_owned()))?;
        Ok(staff.values().find(|r| r.email == email).cloned())
    }

    async fn find_by_id(&self, staff_id: &str) -> Result<Option<StaffRecord>, AuthError> {
        let staff = self
            .staff
            .read()
            .map_err(|_| AuthError::StoreError("staff lock poisoned".to_owned()))?;
        Ok(staff.get(staff_id).cloned())
    }
}
