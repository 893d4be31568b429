//! In-memory session storage.
//!
//! Suitable for the demo deployment and tests; sessions are lost when the
//! process restarts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::crypto::{generate_token, DEFAULT_TOKEN_LENGTH};
use crate::AuthError;

use super::repository::{SessionRepository, SessionUpdate};
use super::{Session, SessionData};

#[derive(Clone)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn is_live(data: &SessionData) -> bool {
    match data.expires_at {
        Some(expires_at) => Utc::now() <= expires_at,
        None => true,
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, data: SessionData) -> Result<String, AuthError> {
        let session_id = generate_token(DEFAULT_TOKEN_LENGTH);

        self.sessions
            .write()
            .map_err(|_| AuthError::StoreError("session lock poisoned".to_owned()))?
            .insert(session_id.clone(), data);

        Ok(session_id)
    }

    async fn find(&self, session_id: &str) -> Result<Option<Session>, AuthError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| AuthError::StoreError("session lock poisoned".to_owned()))?;

        Ok(sessions
            .get(session_id)
            .filter(|data| is_live(data))
            .map(|data| Session::new(session_id.to_owned(), data.clone())))
    }

    async fn update(&self, session_id: &str, f: SessionUpdate) -> Result<bool, AuthError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StoreError("session lock poisoned".to_owned()))?;

        match sessions.get_mut(session_id).filter(|data| is_live(data)) {
            Some(data) => f(data).map(|_| true),
            None => Ok(false),
        }
    }

    async fn destroy(&self, session_id: &str) -> Result<(), AuthError> {
        self.sessions
            .write()
            .map_err(|_| AuthError::StoreError("session lock poisoned".to_owned()))?
            .remove(session_id);

        Ok(())
    }

    async fn prune_expired(&self) -> Result<u64, AuthError> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| AuthError::StoreError("session lock poisoned".to_owned()))?;

        let before = sessions.len();
        sessions.retain(|_, data| is_live(data));
        let pruned = before.saturating_sub(sessions.len());

        Ok(pruned as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemorySessionRepository::new();

        let session_id = repo.create(SessionData::new()).await.unwrap();
        assert_eq!(session_id.len(), 32);

        let found = repo.find(&session_id).await.unwrap().unwrap();
        assert_eq!(found.id, session_id);
        assert!(found.data.identity.is_none());
    }

    #[tokio::test]
    async fn test_find_nonexistent() {
        let repo = InMemorySessionRepository::new();
        assert!(repo.find("nonexistent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_applies_under_lock() {
        let repo = InMemorySessionRepository::new();
        let session_id = repo.create(SessionData::new()).await.unwrap();

        let applied = repo
            .update(
                &session_id,
                Box::new(|data| {
                    data.identity = Some("alice@example.com".to_owned());
                    Ok(())
                }),
            )
            .await
            .unwrap();
        assert!(applied);

        let found = repo.find(&session_id).await.unwrap().unwrap();
        assert_eq!(found.data.identity.as_deref(), Some("alice@example.com"));
    }

    #[tokio::test]
    async fn test_update_missing_session_is_false() {
        let repo = InMemorySessionRepository::new();
        let applied = repo
            .update("nonexistent", Box::new(|_| Ok(())))
            .await
            .unwrap();
        assert!(!applied);
    }

    #[tokio::test]
    async fn test_update_closure_error_propagates() {
        let repo = InMemorySessionRepository::new();
        let session_id = repo.create(SessionData::new()).await.unwrap();

        let result = repo
            .update(&session_id, Box::new(|_| Err(AuthError::RoleLocked)))
            .await;
        assert_eq!(result, Err(AuthError::RoleLocked));
    }

    #[tokio::test]
    async fn test_destroy() {
        let repo = InMemorySessionRepository::new();
        let session_id = repo.create(SessionData::new()).await.unwrap();

        repo.destroy(&session_id).await.unwrap();
        assert!(repo.find(&session_id).await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_expired_session_reported_absent_and_pruned() {
        let repo = InMemorySessionRepository::new();

        let mut expired = SessionData::new();
        expired.expires_at = Some(Utc::now() - Duration::minutes(1));
        let expired_id = repo.create(expired).await.unwrap();
        let live_id = repo.create(SessionData::new()).await.unwrap();

        assert!(repo.find(&expired_id).await.unwrap().is_none());
        assert!(repo.find(&live_id).await.unwrap().is_some());

        let pruned = repo.prune_expired().await.unwrap();
        assert_eq!(pruned, 1);
        assert_eq!(repo.len(), 1);
    }
}
