//! HTTP handlers for the gated core flow.

use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;

use super::error::AppError;
use super::middleware::MaybeSession;
use super::routes::AppState;
use crate::actions::{
    EstablishIdentityAction, IssueChallengeAction, LogoutAction, SelectRoleAction,
    VerifyAdminBiometricAction, VerifyTotpAction, ViewRecordAction,
};
use crate::api::{
    CallbackParams, ChallengeResponse, MessageResponse, RecordResponse, RedirectResponse,
    SelectRoleRequest, StatusResponse, TotpSetupResponse, VerifyAdminBioRequest,
    VerifyTotpRequest,
};
use crate::identity::IdentityProvider;
use crate::records::RecordStore;
use crate::session::{build_clear_cookie, build_set_cookie, sign_session_id, Role,
    SessionRepository};
use crate::staff::StaffRepository;
use crate::{gate, AuthError};

pub(super) fn cookie_header(value: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(value)
        .map_err(|_| AppError(AuthError::StoreError("invalid cookie value".to_owned())))
}

/// Start the identity-provider login flow.
///
/// GET /login
pub async fn login<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
) -> Json<RedirectResponse>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    Json(RedirectResponse {
        redirect: state.identity.authorize_url(),
    })
}

/// Complete the provider callback and establish a fresh session.
///
/// GET /auth/callback?code=...
pub async fn auth_callback<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    Query(params): Query<CallbackParams>,
    session: MaybeSession,
) -> Result<impl IntoResponse, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let action = EstablishIdentityAction::new(
        state.sessions.clone(),
        state.identity.clone(),
        state.session_config.session_lifetime,
    );
    let prior = session.0.as_ref().map(|s| s.id.as_str());
    let (session_id, _) = action.execute(&params.code, prior).await?;

    let signed = sign_session_id(&session_id, &state.session_config.secret_key);
    let cookie = build_set_cookie(&state.session_config, &signed);

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie_header(&cookie)?);

    Ok((
        headers,
        Json(RedirectResponse {
            redirect: "/select-role".to_owned(),
        }),
    ))
}

/// Bind a role to the session and point at its security gate.
///
/// POST /select-role
pub async fn select_role<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Json(body): Json<SelectRoleRequest>,
) -> Result<Json<RedirectResponse>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let session = session.0.ok_or(AppError(AuthError::LoginRequired))?;

    let action = SelectRoleAction::new(state.sessions.clone());
    let role = action.execute(&session.id, &body.role).await?;

    let redirect = match role {
        Role::Admin => "/admin-biometric",
        Role::Patient => "/setup-2fa",
    };
    Ok(Json(RedirectResponse {
        redirect: redirect.to_owned(),
    }))
}

/// Issue the current window's spoken challenge to an admin session.
///
/// GET /get-challenge-phrase
pub async fn get_challenge_phrase<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
) -> Result<Json<ChallengeResponse>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let session = session.0.ok_or(AppError(AuthError::LoginRequired))?;

    let action =
        IssueChallengeAction::new(state.sessions.clone(), (*state.challenges).clone());
    let challenge = action.execute(&session.id).await?;

    Ok(Json(ChallengeResponse {
        phrase: challenge.phrase,
        expires_in: challenge.expires_in,
    }))
}

/// Verify the admin face + voice samples and spoken challenge.
///
/// POST /verify-admin-bio
pub async fn verify_admin_bio<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Json(body): Json<VerifyAdminBioRequest>,
) -> Result<Json<StatusResponse>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let session = session.0.ok_or(AppError(AuthError::LoginRequired))?;

    let action = VerifyAdminBiometricAction::new(
        state.sessions.clone(),
        state.staff.clone(),
        state.policy,
    );
    action
        .execute(
            &session.id,
            &body.email,
            &body.face_sample,
            &body.voice_sample,
            &body.spoken_phrase,
        )
        .await?;

    Ok(Json(StatusResponse {
        status: "Success".to_owned(),
        message: "Admin Identity Confirmed".to_owned(),
    }))
}

/// Provisioning URI for enrolling an authenticator app. Patients only.
///
/// GET /setup-2fa
pub async fn setup_2fa<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
) -> Result<Json<TotpSetupResponse>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let session = session.0.ok_or(AppError(AuthError::LoginRequired))?;
    gate::check_role(&session.data, Role::Patient)?;

    let account = session.data.identity.as_deref().unwrap_or_default();
    Ok(Json(TotpSetupResponse {
        otpauth_url: state.totp.provisioning_uri(account),
    }))
}

/// Validate the 6-digit one-time code for a patient session.
///
/// POST /verify-2fa
pub async fn verify_2fa<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Json(body): Json<VerifyTotpRequest>,
) -> Result<Json<RedirectResponse>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let session = session.0.ok_or(AppError(AuthError::LoginRequired))?;

    let action = VerifyTotpAction::new(state.sessions.clone(), (*state.totp).clone());
    action.execute(&session.id, &body.code).await?;

    Ok(Json(RedirectResponse {
        redirect: "/dashboard".to_owned(),
    }))
}

/// Decrypt a record for a fully verified session.
///
/// GET /view_record/{record_id}
pub async fn view_record<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Path(record_id): Path<String>,
) -> Result<Json<RecordResponse>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let action = ViewRecordAction::new(state.records.clone(), state.cipher.clone());
    let view = action
        .execute(session.0.as_ref().map(|s| &s.data), &record_id)
        .await?;

    Ok(Json(RecordResponse {
        record: view.record,
        audit: view.audit,
    }))
}

/// Destroy the session and clear the cookie.
///
/// GET /logout
pub async fn logout<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
) -> Result<impl IntoResponse, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    if let Some(session) = session.0 {
        LogoutAction::new(state.sessions.clone())
            .execute(&session.id)
            .await?;
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        cookie_header(&build_clear_cookie(&state.session_config))?,
    );

    Ok((
        headers,
        Json(MessageResponse {
            message: "Logged out".to_owned(),
        }),
    ))
}
