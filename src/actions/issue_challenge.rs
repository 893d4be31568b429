use chrono::Utc;

use crate::challenge::{Challenge, ChallengeGenerator};
use crate::events::{dispatch, PortalEvent};
use crate::session::{Role, SessionRepository};
use crate::{gate, AuthError};

/// Issues the current window's spoken challenge to an admin session and
/// pins it to the session for the later biometric check.
pub struct IssueChallengeAction<S: SessionRepository> {
    sessions: S,
    generator: ChallengeGenerator,
}

impl<S: SessionRepository> IssueChallengeAction<S> {
    pub fn new(sessions: S, generator: ChallengeGenerator) -> Self {
        IssueChallengeAction {
            sessions,
            generator,
        }
    }

    pub async fn execute(&self, session_id: &str) -> Result<Challenge, AuthError> {
        let challenge = self.generator.current(Utc::now());

        let phrase = challenge.phrase.clone();
        let applied = self
            .sessions
            .update(session_id, Box::new(move |data| {
                gate::check_role(data, Role::Admin)?;
                data.current_challenge = Some(phrase);
                Ok(())
            }))
            .await?;
        if !applied {
            return Err(AuthError::LoginRequired);
        }

        let identity = match self.sessions.find(session_id).await? {
            Some(session) => session.data.identity.unwrap_or_default(),
            None => return Err(AuthError::LoginRequired),
        };

        dispatch(PortalEvent::ChallengeIssued {
            identity,
            phrase: challenge.phrase.clone(),
            at: Utc::now(),
        })
        .await;

        Ok(challenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::MEDICAL_PHRASES;
    use crate::session::SessionData;
    use crate::InMemorySessionRepository;

    async fn admin_session(sessions: &InMemorySessionRepository) -> String {
        let mut data = SessionData::new();
        crate::gate::establish_identity(
            &mut data,
            "admin@example.com".to_owned(),
            "Admin".to_owned(),
        );
        crate::gate::apply_role_selection(&mut data, Role::Admin).unwrap();
        sessions.create(data).await.unwrap()
    }

    #[tokio::test]
    async fn test_issue_pins_challenge_to_session() {
        let sessions = InMemorySessionRepository::new();
        let session_id = admin_session(&sessions).await;

        let action = IssueChallengeAction::new(sessions.clone(), ChallengeGenerator::default());
        let challenge = action.execute(&session_id).await.unwrap();

        assert!(MEDICAL_PHRASES.contains(&challenge.phrase.as_str()));
        assert!(challenge.expires_in > 0 && challenge.expires_in <= 120);

        let session = sessions.find(&session_id).await.unwrap().unwrap();
        assert_eq!(session.data.current_challenge, Some(challenge.phrase));
    }

    #[tokio::test]
    async fn test_repeat_within_window_is_stable() {
        let sessions = InMemorySessionRepository::new();
        let session_id = admin_session(&sessions).await;

        // 1-hour window so both calls land in the same window
        let action = IssueChallengeAction::new(sessions, ChallengeGenerator::new(3600));
        let first = action.execute(&session_id).await.unwrap();
        let second = action.execute(&session_id).await.unwrap();
        assert_eq!(first.phrase, second.phrase);
    }

    #[tokio::test]
    async fn test_patient_session_is_refused() {
        let sessions = InMemorySessionRepository::new();
        let mut data = SessionData::new();
        crate::gate::establish_identity(
            &mut data,
            "alice@example.com".to_owned(),
            "Alice".to_owned(),
        );
        crate::gate::apply_role_selection(&mut data, Role::Patient).unwrap();
        let session_id = sessions.create(data).await.unwrap();

        let action = IssueChallengeAction::new(sessions.clone(), ChallengeGenerator::default());
        let result = action.execute(&session_id).await;
        assert_eq!(result.unwrap_err(), AuthError::RoleMismatch);

        let session = sessions.find(&session_id).await.unwrap().unwrap();
        assert!(session.data.current_challenge.is_none());
    }

    #[tokio::test]
    async fn test_missing_session_requires_login() {
        let action = IssueChallengeAction::new(
            InMemorySessionRepository::new(),
            ChallengeGenerator::default(),
        );
        let result = action.execute("nope").await;
        assert_eq!(result.unwrap_err(), AuthError::LoginRequired);
    }
}
