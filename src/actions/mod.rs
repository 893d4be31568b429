pub mod establish_identity;
pub mod issue_challenge;
pub mod logout;
pub mod register_staff;
pub mod select_role;
pub mod verify_admin_biometric;
pub mod verify_staff_biometric;
pub mod verify_staff_credentials;
pub mod verify_totp;
pub mod view_record;

pub use establish_identity::EstablishIdentityAction;
pub use issue_challenge::IssueChallengeAction;
pub use logout::LogoutAction;
pub use register_staff::RegisterStaffAction;
pub use select_role::SelectRoleAction;
pub use verify_admin_biometric::VerifyAdminBiometricAction;
pub use verify_staff_biometric::VerifyStaffBiometricAction;
pub use verify_staff_credentials::VerifyStaffCredentialsAction;
pub use verify_totp::VerifyTotpAction;
pub use view_record::ViewRecordAction;
