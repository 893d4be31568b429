use chrono::{Duration, Utc};

use crate::events::{dispatch, PortalEvent};
use crate::identity::{IdentityClaims, IdentityProvider};
use crate::session::{SessionData, SessionRepository};
use crate::{gate, AuthError};

/// Completes the identity-provider callback: exchanges the code for
/// claims and replaces any prior session with a fresh one.
pub struct EstablishIdentityAction<S: SessionRepository, I: IdentityProvider> {
    sessions: S,
    identity: I,
    session_lifetime: Option<Duration>,
}

impl<S: SessionRepository, I: IdentityProvider> EstablishIdentityAction<S, I> {
    pub fn new(sessions: S, identity: I, session_lifetime: Option<Duration>) -> Self {
        EstablishIdentityAction {
            sessions,
            identity,
            session_lifetime,
        }
    }

    pub async fn execute(
        &self,
        code: &str,
        prior_session_id: Option<&str>,
    ) -> Result<(String, IdentityClaims), AuthError> {
        let claims = self.identity.exchange_code(code).await?;

        // A new login never inherits role or verification state.
        if let Some(prior) = prior_session_id {
            self.sessions.destroy(prior).await?;
        }

        let mut data = SessionData::new();
        data.expires_at = self.session_lifetime.map(|lifetime| Utc::now() + lifetime);
        gate::establish_identity(&mut data, claims.email.clone(), claims.name.clone());

        let session_id = self.sessions.create(data).await?;

        log::info!(
            target: "medgate",
            "msg=\"identity established\" identity={}",
            claims.email
        );
        dispatch(PortalEvent::IdentityEstablished {
            session_id: session_id.clone(),
            identity: claims.email.clone(),
            at: Utc::now(),
        })
        .await;

        Ok((session_id, claims))
    }
}
