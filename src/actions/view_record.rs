use std::sync::Arc;

use chrono::Utc;

use crate::crypto::RecordCipher;
use crate::events::{dispatch, PortalEvent};
use crate::records::RecordStore;
use crate::session::SessionData;
use crate::{gate, AuthError};

/// Decrypted record with its audit line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordView {
    pub record: String,
    pub audit: String,
}

/// Decrypts a record for a fully verified session.
///
/// The gate runs before any storage lookup, so an unauthorized caller
/// cannot distinguish existing record ids from missing ones.
pub struct ViewRecordAction<R: RecordStore> {
    records: R,
    cipher: Arc<RecordCipher>,
}

impl<R: RecordStore> ViewRecordAction<R> {
    pub fn new(records: R, cipher: Arc<RecordCipher>) -> Self {
        ViewRecordAction { records, cipher }
    }

    pub async fn execute(
        &self,
        session: Option<&SessionData>,
        record_id: &str,
    ) -> Result<RecordView, AuthError> {
        let data = session.ok_or(AuthError::LoginRequired)?;
        let (identity, role) = gate::authorize_record_access(data)?;

        let ciphertext = self
            .records
            .get(record_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        let plaintext = self.cipher.decrypt(&ciphertext)?;
        let record = String::from_utf8(plaintext)
            .map_err(|_| AuthError::StoreError("record is not valid utf-8".to_owned()))?;

        let audit = format!("Accessed by {} as {}", identity, role);
        log::info!(
            target: "medgate",
            "msg=\"record accessed\" identity={} role={} record_id={}",
            identity,
            role,
            record_id
        );
        dispatch(PortalEvent::RecordAccessed {
            identity,
            role,
            record_id: record_id.to_owned(),
            at: Utc::now(),
        })
        .await;

        Ok(RecordView { record, audit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use crate::InMemoryRecordStore;

    fn cipher() -> Arc<RecordCipher> {
        Arc::new(RecordCipher::new(RecordCipher::generate_key().unwrap()).unwrap())
    }

    fn verified_patient() -> SessionData {
        let mut data = SessionData::new();
        crate::gate::establish_identity(
            &mut data,
            "alice@example.com".to_owned(),
            "Alice".to_owned(),
        );
        crate::gate::apply_role_selection(&mut data, Role::Patient).unwrap();
        crate::gate::mark_patient_verified(&mut data).unwrap();
        data
    }

    async fn seeded_store(cipher: &RecordCipher) -> InMemoryRecordStore {
        let records = InMemoryRecordStore::new();
        let sealed = cipher.encrypt(b"Blood Type: O+, Allergy: Penicillin").unwrap();
        records.put("R1", sealed).await.unwrap();
        records
    }

    #[tokio::test]
    async fn test_verified_session_reads_record_with_audit() {
        let cipher = cipher();
        let records = seeded_store(&cipher).await;
        let action = ViewRecordAction::new(records, cipher);

        let view = action
            .execute(Some(&verified_patient()), "R1")
            .await
            .unwrap();
        assert_eq!(view.record, "Blood Type: O+, Allergy: Penicillin");
        assert_eq!(view.audit, "Accessed by alice@example.com as patient");
    }

    #[tokio::test]
    async fn test_no_session_requires_login() {
        let cipher = cipher();
        let records = seeded_store(&cipher).await;
        let action = ViewRecordAction::new(records, cipher);

        let result = action.execute(None, "R1").await;
        assert_eq!(result.unwrap_err(), AuthError::LoginRequired);
    }

    #[tokio::test]
    async fn test_unverified_session_is_denied_before_lookup() {
        let cipher = cipher();
        let records = seeded_store(&cipher).await;
        let action = ViewRecordAction::new(records, cipher);

        let mut data = SessionData::new();
        crate::gate::establish_identity(
            &mut data,
            "alice@example.com".to_owned(),
            "Alice".to_owned(),
        );
        crate::gate::apply_role_selection(&mut data, Role::Patient).unwrap();

        // same denial for existing and missing record ids
        let existing = action.execute(Some(&data), "R1").await;
        let missing = action.execute(Some(&data), "no-such-record").await;
        assert_eq!(existing.unwrap_err(), AuthError::TwoFactorRequired);
        assert_eq!(missing.unwrap_err(), AuthError::TwoFactorRequired);
    }

    #[tokio::test]
    async fn test_unknown_record_for_verified_session() {
        let cipher = cipher();
        let records = seeded_store(&cipher).await;
        let action = ViewRecordAction::new(records, cipher);

        let result = action.execute(Some(&verified_patient()), "R9").await;
        assert_eq!(result.unwrap_err(), AuthError::NotFound);
    }
}
