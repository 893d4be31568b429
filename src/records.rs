//! Opaque encrypted record storage.
//!
//! The store holds ciphertext only; encryption and decryption happen in
//! [`RecordCipher`](crate::crypto::RecordCipher) at the access boundary.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::AuthError;

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, record_id: &str) -> Result<Option<Vec<u8>>, AuthError>;
    async fn put(&self, record_id: &str, ciphertext: Vec<u8>) -> Result<(), AuthError>;
    async fn delete(&self, record_id: &str) -> Result<(), AuthError>;
}

#[derive(Clone)]
pub struct InMemoryRecordStore {
    records: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get(&self, record_id: &str) -> Result<Option<Vec<u8>>, AuthError> {
        let records = self
            .records
            .read()
            .map_err(|_| AuthError::StoreError("record lock poisoned".to_owned()))?;
        Ok(records.get(record_id).cloned())
    }

    async fn put(&self, record_id: &str, ciphertext: Vec<u8>) -> Result<(), AuthError> {
        self.records
            .write()
            .map_err(|_| AuthError::StoreError("record lock poisoned".to_owned()))?
            .insert(record_id.to_owned(), ciphertext);
        Ok(())
    }

    async fn delete(&self, record_id: &str) -> Result<(), AuthError> {
        self.records
            .write()
            .map_err(|_| AuthError::StoreError("record lock poisoned".to_owned()))?
            .remove(record_id);
        Ok(())
    }
}
