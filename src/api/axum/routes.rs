use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use super::{dashboard, handlers};
use crate::biometric::BiometricPolicy;
use crate::challenge::ChallengeGenerator;
use crate::crypto::RecordCipher;
use crate::identity::IdentityProvider;
use crate::records::RecordStore;
use crate::session::{SessionConfig, SessionRepository};
use crate::staff::StaffRepository;
use crate::totp::TotpVerifier;

#[derive(Clone)]
pub struct AppState<S, F, R, I> {
    pub sessions: S,
    pub staff: F,
    pub records: R,
    pub identity: I,
    pub cipher: Arc<RecordCipher>,
    pub totp: Arc<TotpVerifier>,
    pub challenges: Arc<ChallengeGenerator>,
    pub policy: BiometricPolicy,
    pub session_config: Arc<SessionConfig>,
}

/// All portal endpoints: the gated core flow, the patient dashboard, and
/// the staff surface.
pub fn portal_routes<S, F, R, I>() -> Router<AppState<S, F, R, I>>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(core_routes())
        .merge(patient_routes())
        .merge(staff_routes())
}

/// Login, role selection, both second-factor gates, and record access.
pub fn core_routes<S, F, R, I>() -> Router<AppState<S, F, R, I>>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/login", get(handlers::login::<S, F, R, I>))
        .route("/auth/callback", get(handlers::auth_callback::<S, F, R, I>))
        .route("/select-role", post(handlers::select_role::<S, F, R, I>))
        .route(
            "/get-challenge-phrase",
            get(handlers::get_challenge_phrase::<S, F, R, I>),
        )
        .route(
            "/verify-admin-bio",
            post(handlers::verify_admin_bio::<S, F, R, I>),
        )
        .route("/setup-2fa", get(handlers::setup_2fa::<S, F, R, I>))
        .route("/verify-2fa", post(handlers::verify_2fa::<S, F, R, I>))
        .route(
            "/view_record/{record_id}",
            get(handlers::view_record::<S, F, R, I>),
        )
        .route("/logout", get(handlers::logout::<S, F, R, I>))
}

/// Patient dashboard endpoints plus the ungated FAQ chatbot.
pub fn patient_routes<S, F, R, I>() -> Router<AppState<S, F, R, I>>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/patient/profile",
            get(dashboard::patient_profile::<S, F, R, I>),
        )
        .route(
            "/patient/update-profile",
            post(dashboard::update_profile::<S, F, R, I>),
        )
        .route(
            "/patient/health-status",
            get(dashboard::health_status::<S, F, R, I>),
        )
        .route(
            "/patient/bmi-calculate",
            post(dashboard::bmi_calculate::<S, F, R, I>),
        )
        .route(
            "/patient/appointments/{patient_id}",
            get(dashboard::appointments::<S, F, R, I>),
        )
        .route(
            "/patient/book-appointment/{patient_id}",
            post(dashboard::book_appointment::<S, F, R, I>),
        )
        .route(
            "/patient/cancel-appointment/{appointment_id}",
            post(dashboard::cancel_appointment::<S, F, R, I>),
        )
        .route(
            "/patient/reports/{patient_id}",
            get(dashboard::reports::<S, F, R, I>),
        )
        .route(
            "/chatbot/message",
            post(dashboard::chatbot_message::<S, F, R, I>),
        )
}

/// Staff signup and the two-step staff login.
pub fn staff_routes<S, F, R, I>() -> Router<AppState<S, F, R, I>>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/medical-staff/signup",
            post(dashboard::staff_signup::<S, F, R, I>),
        )
        .route(
            "/medical-staff/verify-credentials",
            post(dashboard::staff_verify_credentials::<S, F, R, I>),
        )
        .route(
            "/medical-staff/verify-biometric",
            post(dashboard::staff_verify_biometric::<S, F, R, I>),
        )
        .route(
            "/medical-staff/dashboard",
            get(dashboard::staff_dashboard::<S, F, R, I>),
        )
        .route(
            "/medical-staff/logout",
            post(dashboard::staff_logout::<S, F, R, I>),
        )
}
