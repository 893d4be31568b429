use chrono::Utc;

use crate::events::{dispatch, PortalEvent};
use crate::session::{Role, SessionRepository};
use crate::{gate, AuthError};

/// Binds a role to an identified session, choosing which second factor
/// the session must clear next.
pub struct SelectRoleAction<S: SessionRepository> {
    sessions: S,
}

impl<S: SessionRepository> SelectRoleAction<S> {
    pub fn new(sessions: S) -> Self {
        SelectRoleAction { sessions }
    }

    pub async fn execute(&self, session_id: &str, raw_role: &str) -> Result<Role, AuthError> {
        let role = Role::parse(raw_role)?;

        let applied = self
            .sessions
            .update(session_id, Box::new(move |data| {
                gate::apply_role_selection(data, role)
            }))
            .await?;
        if !applied {
            return Err(AuthError::LoginRequired);
        }

        let identity = match self.sessions.find(session_id).await? {
            Some(session) => session.data.identity.unwrap_or_default(),
            None => return Err(AuthError::LoginRequired),
        };

        log::info!(
            target: "medgate",
            "msg=\"role selected\" identity={} role={}",
            identity,
            role
        );
        dispatch(PortalEvent::RoleSelected {
            identity,
            role,
            at: Utc::now(),
        })
        .await;

        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionData;
    use crate::InMemorySessionRepository;

    async fn identified_session(sessions: &InMemorySessionRepository) -> String {
        let mut data = SessionData::new();
        crate::gate::establish_identity(
            &mut data,
            "alice@example.com".to_owned(),
            "Alice".to_owned(),
        );
        sessions.create(data).await.unwrap()
    }

    #[tokio::test]
    async fn test_select_role() {
        let sessions = InMemorySessionRepository::new();
        let session_id = identified_session(&sessions).await;

        let action = SelectRoleAction::new(sessions.clone());
        let role = action.execute(&session_id, "patient").await.unwrap();
        assert_eq!(role, Role::Patient);

        let session = sessions.find(&session_id).await.unwrap().unwrap();
        assert_eq!(session.data.role, Some(Role::Patient));
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let sessions = InMemorySessionRepository::new();
        let session_id = identified_session(&sessions).await;

        let action = SelectRoleAction::new(sessions);
        let result = action.execute(&session_id, "doctor").await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidRole);
    }

    #[tokio::test]
    async fn test_missing_session_requires_login() {
        let action = SelectRoleAction::new(InMemorySessionRepository::new());
        let result = action.execute("no-such-session", "admin").await;
        assert_eq!(result.unwrap_err(), AuthError::LoginRequired);
    }

    #[tokio::test]
    async fn test_unidentified_session_requires_login() {
        let sessions = InMemorySessionRepository::new();
        let session_id = sessions.create(SessionData::new()).await.unwrap();

        let action = SelectRoleAction::new(sessions);
        let result = action.execute(&session_id, "admin").await;
        assert_eq!(result.unwrap_err(), AuthError::LoginRequired);
    }
}
