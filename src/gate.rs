//! Session-gating state machine.
//!
//! Sessions move `Unauthenticated -> IdentityKnown -> RoleSelected ->
//! SecondFactorVerified`; the helpers here are the only writers of the
//! verified flags and keep the invariant that a flag may only be true
//! while `identity` is set and `role` matches. They run inside
//! [`SessionRepository::update`](crate::session::SessionRepository::update)
//! closures, so each transition is one per-session critical section.

use crate::session::{Role, SessionData};
use crate::AuthError;

/// Replaces whatever the session held with a freshly authenticated
/// identity. No stale role or verification flags survive.
pub fn establish_identity(data: &mut SessionData, email: String, name: String) {
    let created_at = data.created_at;
    let expires_at = data.expires_at;
    *data = SessionData::new();
    data.created_at = created_at;
    data.expires_at = expires_at;
    data.identity = Some(email);
    data.display_name = Some(name);
}

/// `IdentityKnown -> RoleSelected`.
///
/// Selecting a role resets any prior challenge; once a second factor has
/// been verified the role is locked until logout.
pub fn apply_role_selection(data: &mut SessionData, role: Role) -> Result<(), AuthError> {
    if data.identity.is_none() {
        return Err(AuthError::LoginRequired);
    }
    if data.admin_verified || data.patient_verified {
        return Err(AuthError::RoleLocked);
    }

    data.role = Some(role);
    data.current_challenge = None;
    Ok(())
}

/// Precondition for role-scoped endpoints: identity present and the
/// selected role matches.
pub fn check_role(data: &SessionData, role: Role) -> Result<(), AuthError> {
    if data.identity.is_none() {
        return Err(AuthError::LoginRequired);
    }
    if data.role != Some(role) {
        return Err(AuthError::RoleMismatch);
    }
    Ok(())
}

/// `RoleSelected(admin) -> SecondFactorVerified`.
pub fn mark_admin_verified(data: &mut SessionData) -> Result<(), AuthError> {
    check_role(data, Role::Admin)?;
    data.admin_verified = true;
    Ok(())
}

/// `RoleSelected(patient) -> SecondFactorVerified`.
pub fn mark_patient_verified(data: &mut SessionData) -> Result<(), AuthError> {
    check_role(data, Role::Patient)?;
    data.patient_verified = true;
    Ok(())
}

/// The guard consulted by every record-access operation.
///
/// Access requires an identity AND a role whose second factor has been
/// verified; every other combination is denied with the specific missing
/// requirement, never a generic error.
pub fn authorize_record_access(data: &SessionData) -> Result<(String, Role), AuthError> {
    let identity = data.identity.clone().ok_or(AuthError::LoginRequired)?;

    match data.role {
        Some(Role::Admin) if data.admin_verified => Ok((identity, Role::Admin)),
        Some(Role::Admin) => Err(AuthError::BiometricRequired),
        Some(Role::Patient) if data.patient_verified => Ok((identity, Role::Patient)),
        Some(Role::Patient) => Err(AuthError::TwoFactorRequired),
        None => Err(AuthError::RoleMismatch),
    }
}
