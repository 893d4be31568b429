use serde::{Deserialize, Serialize};

// Request DTOs

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectRoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyAdminBioRequest {
    pub email: String,
    pub face_sample: String,
    pub voice_sample: String,
    pub spoken_phrase: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyTotpRequest {
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct BmiRequest {
    pub height: f64,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_name: String,
    pub department: String,
    pub date: String,
    pub time: String,
    pub reason: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct StaffSignupRequest {
    pub name: String,
    pub email: String,
    pub license_number: String,
    pub department: String,
    pub password: String,
    /// Base64-encoded face image.
    pub face_image: String,
    /// Base64-encoded voice recording.
    pub voice_recording: String,
}

#[derive(Debug, Deserialize)]
pub struct StaffCredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct StaffBiometricRequest {
    pub face_sample: String,
    pub voice_sample: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportsQuery {
    #[serde(default = "default_period")]
    pub period: String,
}

fn default_period() -> String {
    "week".to_owned()
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct RedirectResponse {
    pub redirect: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub phrase: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct TotpSetupResponse {
    pub otpauth_url: String,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub record: String,
    pub audit: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct BmiResponse {
    pub bmi: f64,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct StaffSignupResponse {
    pub status: String,
    pub message: String,
    pub staff_id: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<crate::AuthError> for ErrorResponse {
    fn from(err: crate::AuthError) -> Self {
        let code = match &err {
            crate::AuthError::InvalidRole => "INVALID_ROLE",
            crate::AuthError::InvalidCode => "INVALID_CODE",
            crate::AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            crate::AuthError::Validation(_) => "VALIDATION_ERROR",
            crate::AuthError::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            crate::AuthError::LoginRequired => "LOGIN_REQUIRED",
            crate::AuthError::StaffAuthRequired => "STAFF_AUTH_REQUIRED",
            crate::AuthError::RoleMismatch => "ROLE_MISMATCH",
            crate::AuthError::RoleLocked => "ROLE_LOCKED",
            crate::AuthError::BiometricRequired => "BIOMETRIC_REQUIRED",
            crate::AuthError::TwoFactorRequired => "TWO_FACTOR_REQUIRED",
            crate::AuthError::BiometricRejected => "BIOMETRIC_REJECTED",
            crate::AuthError::NotFound => "NOT_FOUND",
            crate::AuthError::AuthFailed => "AUTH_FAILED",
            crate::AuthError::StoreError(_) => "STORE_ERROR",
            crate::AuthError::ConfigError(_) => "CONFIG_ERROR",
        };

        ErrorResponse {
            error: err.to_string(),
            code: code.to_owned(),
        }
    }
}
