use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::error::AppError;
use super::routes::AppState;
use crate::identity::IdentityProvider;
use crate::records::RecordStore;
use crate::session::{verify_signed_cookie, Session, SessionRepository};
use crate::staff::StaffRepository;

/// Resolves the session cookie, if any, to a live session.
///
/// A missing, tampered, or expired cookie is not a rejection; each
/// endpoint decides what an absent session means for it.
pub struct MaybeSession(pub Option<Session>);

/// Extracts the named cookie from the `Cookie` header(s).
pub fn extract_session_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == cookie_name).then(|| value.to_owned())
        })
}

impl<S, F, R, I> FromRequestParts<AppState<S, F, R, I>> for MaybeSession
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S, F, R, I>,
    ) -> Result<Self, Self::Rejection> {
        let cookie =
            extract_session_cookie(&parts.headers, &state.session_config.cookie_name);
        let Some(cookie) = cookie else {
            return Ok(MaybeSession(None));
        };

        let Some(session_id) = verify_signed_cookie(&cookie, &state.session_config.secret_key)
        else {
            return Ok(MaybeSession(None));
        };

        let session = state.sessions.find(&session_id).await.map_err(AppError)?;
        Ok(MaybeSession(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_extracts_named_cookie() {
        let headers = headers("other=1; medgate_session=abc.def; theme=dark");
        assert_eq!(
            extract_session_cookie(&headers, "medgate_session"),
            Some("abc.def".to_owned())
        );
    }

    #[test]
    fn test_missing_cookie() {
        let headers = headers("other=1; theme=dark");
        assert_eq!(extract_session_cookie(&headers, "medgate_session"), None);
    }

    #[test]
    fn test_no_cookie_header() {
        assert_eq!(
            extract_session_cookie(&HeaderMap::new(), "medgate_session"),
            None
        );
    }
}
