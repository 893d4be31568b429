//! Patient dashboard, FAQ chatbot, and medical staff endpoints.
//!
//! The dashboard payloads are demo fixtures; the session gating around
//! them is the real contract.

use axum::extract::{Path, Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use super::error::AppError;
use super::handlers::cookie_header;
use super::middleware::MaybeSession;
use super::routes::AppState;
use crate::actions::{
    LogoutAction, RegisterStaffAction, VerifyStaffBiometricAction, VerifyStaffCredentialsAction,
};
use crate::api::{
    BmiRequest, BmiResponse, BookAppointmentRequest, ChatMessageRequest, ChatReply, ReportsQuery,
    StaffBiometricRequest, StaffCredentialsRequest, StaffSignupRequest, StaffSignupResponse,
    StatusResponse,
};
use crate::crypto::SecretString;
use crate::identity::IdentityProvider;
use crate::records::RecordStore;
use crate::session::{build_clear_cookie, build_set_cookie, sign_session_id, Role, Session,
    SessionData, SessionRepository};
use crate::staff::{NewStaff, StaffRepository};
use crate::{chatbot, gate, AuthError};

fn patient_session(session: &MaybeSession) -> Result<&SessionData, AppError> {
    let session = session
        .0
        .as_ref()
        .ok_or(AppError(AuthError::LoginRequired))?;
    gate::check_role(&session.data, Role::Patient)?;
    Ok(&session.data)
}

fn staff_session(session: &MaybeSession) -> Result<&Session, AppError> {
    session
        .0
        .as_ref()
        .filter(|s| s.data.staff_authenticated)
        .ok_or(AppError(AuthError::StaffAuthRequired))
}

/// GET /patient/profile
pub async fn patient_profile<S, F, R, I>(
    State(_state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
) -> Result<Json<Value>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let data = patient_session(&session)?;

    Ok(Json(json!({
        "name": data.display_name.as_deref().unwrap_or("Patient Name"),
        "id": "PAT-2026-001",
        "email": data.identity,
        "age": 32,
        "gender": "Male",
        "blood_type": "O+",
        "phone": "+91-9876543210",
        "joined_date": "2024-01-15",
    })))
}

/// POST /patient/update-profile
pub async fn update_profile<S, F, R, I>(
    State(_state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Json(_body): Json<Value>,
) -> Result<Json<Value>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    patient_session(&session)?;
    Ok(Json(json!({ "status": "Profile updated successfully" })))
}

/// GET /patient/health-status
pub async fn health_status<S, F, R, I>(
    State(_state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
) -> Result<Json<Value>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    patient_session(&session)?;

    Ok(Json(json!({
        "current_status": "Stable",
        "blood_pressure": "120/80",
        "heart_rate": 72,
        "temperature": 98.6,
        "last_checkup": "2026-01-28",
    })))
}

/// POST /patient/bmi-calculate
pub async fn bmi_calculate<S, F, R, I>(
    State(_state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Json(body): Json<BmiRequest>,
) -> Result<Json<BmiResponse>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    patient_session(&session)?;

    if body.height <= 0.0 || body.weight <= 0.0 {
        return Err(AppError(AuthError::Validation(
            "height and weight must be positive".to_owned(),
        )));
    }

    let meters = body.height / 100.0;
    let bmi = (body.weight / (meters * meters) * 10.0).round() / 10.0;
    let category = if (18.5..25.0).contains(&bmi) {
        "Normal Weight"
    } else {
        "Overweight"
    };

    Ok(Json(BmiResponse {
        bmi,
        category: category.to_owned(),
    }))
}

/// GET /patient/appointments/{patient_id}
pub async fn appointments<S, F, R, I>(
    State(_state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Path(_patient_id): Path<String>,
) -> Result<Json<Value>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    patient_session(&session)?;

    Ok(Json(json!({
        "appointments": [
            {
                "id": 1,
                "doctor_name": "Dr. Smith",
                "department": "General Medicine",
                "date": "2026-02-10",
                "time": "10:00 AM",
                "status": "confirmed",
            }
        ],
    })))
}

/// POST /patient/book-appointment/{patient_id}
pub async fn book_appointment<S, F, R, I>(
    State(_state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Path(patient_id): Path<String>,
    Json(body): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    patient_session(&session)?;

    let now = chrono::Utc::now().timestamp();
    let appointment = json!({
        "id": now,
        "patient_id": patient_id,
        "doctor_name": body.doctor_name,
        "department": body.department,
        "date": body.date,
        "time": body.time,
        "reason": body.reason,
        "notes": body.notes,
        "status": "confirmed",
        "created_at": now,
    });

    Ok(Json(json!({
        "status": "Appointment booked successfully",
        "appointment": appointment,
        "appointment_id": now,
    })))
}

/// POST /patient/cancel-appointment/{appointment_id}
pub async fn cancel_appointment<S, F, R, I>(
    State(_state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Path(_appointment_id): Path<String>,
) -> Result<Json<Value>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    patient_session(&session)?;
    Ok(Json(json!({ "status": "Appointment cancelled successfully" })))
}

/// GET /patient/reports/{patient_id}?period=week
pub async fn reports<S, F, R, I>(
    State(_state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Path(_patient_id): Path<String>,
    Query(_query): Query<ReportsQuery>,
) -> Result<Json<Value>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    patient_session(&session)?;

    Ok(Json(json!({
        "reports": [
            {
                "id": 1,
                "date": "2026-01-28",
                "day": "Monday",
                "steps": 8234,
                "water": 2.5,
                "calories": 2100,
                "sleep": 7.5,
                "mood": "Good",
                "notes": "Feeling energetic after morning jog",
            },
            {
                "id": 2,
                "date": "2026-01-29",
                "day": "Tuesday",
                "steps": 7891,
                "water": 2.2,
                "calories": 1950,
                "sleep": 7.0,
                "mood": "Excellent",
                "notes": "Great day at work",
            }
        ],
    })))
}

/// POST /chatbot/message
///
/// Deliberately ungated; replies come from a static FAQ table.
pub async fn chatbot_message<S, F, R, I>(
    State(_state): State<AppState<S, F, R, I>>,
    Json(body): Json<ChatMessageRequest>,
) -> Json<ChatReply>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    Json(ChatReply {
        reply: chatbot::reply(&body.message),
    })
}

/// POST /medical-staff/signup
pub async fn staff_signup<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    Json(body): Json<StaffSignupRequest>,
) -> Result<Json<StaffSignupResponse>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let action = RegisterStaffAction::new(state.staff.clone());
    let record = action
        .execute(NewStaff {
            name: body.name,
            email: body.email,
            license_number: body.license_number,
            department: body.department,
            password: SecretString::new(body.password),
            face_image: body.face_image,
            voice_recording: body.voice_recording,
        })
        .await?;

    Ok(Json(StaffSignupResponse {
        status: "success".to_owned(),
        message: "Medical staff account created successfully".to_owned(),
        staff_id: record.staff_id,
    }))
}

/// POST /medical-staff/verify-credentials
pub async fn staff_verify_credentials<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Json(body): Json<StaffCredentialsRequest>,
) -> Result<impl IntoResponse, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let action = VerifyStaffCredentialsAction::new(state.sessions.clone(), state.staff.clone());
    let prior = session.0.as_ref().map(|s| s.id.as_str());
    let (session_id, _) = action.execute(prior, &body.email, &body.password).await?;

    let signed = sign_session_id(&session_id, &state.session_config.secret_key);
    let cookie = build_set_cookie(&state.session_config, &signed);

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie_header(&cookie)?);

    Ok((
        headers,
        Json(StatusResponse {
            status: "success".to_owned(),
            message: "Credentials verified".to_owned(),
        }),
    ))
}

/// POST /medical-staff/verify-biometric
pub async fn staff_verify_biometric<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
    Json(body): Json<StaffBiometricRequest>,
) -> Result<Json<Value>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let session = session.0.ok_or(AppError(AuthError::StaffAuthRequired))?;
    let staff_id = session
        .data
        .staff_id
        .clone()
        .ok_or(AppError(AuthError::StaffAuthRequired))?;

    let action = VerifyStaffBiometricAction::new(
        state.sessions.clone(),
        state.staff.clone(),
        state.policy,
    );
    action
        .execute(&session.id, &body.face_sample, &body.voice_sample)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Biometric verification successful",
        "staff_id": staff_id,
    })))
}

/// GET /medical-staff/dashboard
pub async fn staff_dashboard<S, F, R, I>(
    State(state): State<AppState<S, F, R, I>>,
    session: MaybeSession,
) -> Result<Json<Value>, AppError>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
    F: StaffRepository + Clone + Send + Sync + 'static,
    R: RecordStore + Clone + Send + Sync + 'static,
    I: IdentityProvider + Clone + Send + Sync + 'static,
{
    let session = staff_session(&session)?;
    let staff_id = session
        .data
        .staff_id
        .clone()
        .ok_or(AppError(AuthError::StaffAuthRequired))?;

    let staff = state
        .staff
        .find_by_id(&staff_id)
        .await?
        .ok_or(AppError(AuthError::NotFound))?;

    Ok(Json(json!({
        "staff_id": staff.staff_id,
        "name": staff.name,
        "email": staff.email,
        "department": staff.department,
        "license_number": staff.license_number,
        "patients_today": 5,
        "appointments": 3,
        "pending_tasks": 2,
    })))
}

/// POST /medical-staff/logout
pub async fn staff_logout<S, F, R, I>(
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
        Json(json!({
            "status": "success",
            "message": "Logged out successfully",
        })),
    ))
}
