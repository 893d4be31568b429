use chrono::Utc;

use crate::events::{dispatch, PortalEvent};
use crate::session::SessionRepository;
use crate::AuthError;

/// Destroys a session. Logout always succeeds, even for sessions that no
/// longer exist.
pub struct LogoutAction<S: SessionRepository> {
    sessions: S,
}

impl<S: SessionRepository> LogoutAction<S> {
    pub fn new(sessions: S) -> Self {
        LogoutAction { sessions }
    }

    pub async fn execute(&self, session_id: &str) -> Result<(), AuthError> {
        self.sessions.destroy(session_id).await?;

        log::info!(target: "medgate", "msg=\"logged out\"");
        dispatch(PortalEvent::LoggedOut {
            session_id: session_id.to_owned(),
            at: Utc::now(),
        })
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionData;
    use crate::InMemorySessionRepository;

    #[tokio::test]
    async fn test_logout_destroys_session() {
        let sessions = InMemorySessionRepository::new();
        let session_id = sessions.create(SessionData::new()).await.unwrap();

        let action = LogoutAction::new(sessions.clone());
        action.execute(&session_id).await.unwrap();

        assert!(sessions.find(&session_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_unknown_session_is_ok() {
        let action = LogoutAction::new(InMemorySessionRepository::new());
        assert!(action.execute("never-existed").await.is_ok());
    }
}
