use anyhow::anyhow;
use chrono::Utc;
use tracing::instrument;

use meritbook_closure::WriteRequest;
use meritbook_core::AppError;
use meritbook_models::registrations::{CreateRegistrationDto, RegistrationResponse};
use meritbook_models::{
    AcademicPeriod, Registration, RegistrationId, RegistrationStatus, StudentId,
};

use crate::middleware::auth::AuthUser;
use crate::modules::registrations::store::RegistrationStore;
use crate::state::AppState;

/// Register the caller for an activity.
///
/// This is the canonical period-scoped write path: the permission guard has
/// already run; here the period is validated, the semester write gate is
/// enforced, and only then does the record reach persistence.
#[instrument(skip(state, auth_user, dto))]
pub async fn create_registration(
    state: &AppState,
    auth_user: &AuthUser,
    dto: CreateRegistrationDto,
) -> Result<RegistrationResponse, AppError> {
    let class_id = dto
        .class_id
        .or_else(|| auth_user.class_id())
        .ok_or_else(|| {
            AppError::bad_request(anyhow!("class_id is required for callers without a class"))
        })?;

    let period = AcademicPeriod::from_parts(&dto.hoc_ky, &dto.nam_hoc)
        .map_err(|e| AppError::invalid_period(e.to_string()))?;

    state
        .gate
        .enforce_writable(&WriteRequest {
            class_id: Some(class_id),
            hoc_ky: &dto.hoc_ky,
            nam_hoc: &dto.nam_hoc,
            actor_role: auth_user.role(),
        })
        .await
        .map_err(AppError::from)?;

    // student profile ids mirror user ids in this deployment
    let student_id = StudentId::from_uuid(auth_user.user_id()?.into_inner());

    let registration = Registration {
        id: RegistrationId::new(),
        student_id,
        activity_id: dto.activity_id,
        class_id,
        hoc_ky: period.hoc_ky,
        nam_hoc: period.nam_hoc,
        status: RegistrationStatus::ChoDuyet,
        created_at: Utc::now(),
    };

    let stored = state
        .registrations
        .create(registration)
        .await
        .map_err(AppError::from)?;

    Ok(RegistrationResponse {
        registration: stored,
    })
}

/// Cancel one of the caller's registrations. Cancellation is a mutation of
/// the same period, so the write gate applies here too.
#[instrument(skip(state, auth_user))]
pub async fn cancel_registration(
    state: &AppState,
    auth_user: &AuthUser,
    id: RegistrationId,
) -> Result<RegistrationResponse, AppError> {
    let existing = state
        .registrations
        .get(id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(anyhow!("Registration not found")))?;

    let caller = StudentId::from_uuid(auth_user.user_id()?.into_inner());
    if existing.student_id != caller {
        return Err(AppError::forbidden(
            "You can only cancel your own registrations".to_string(),
        ));
    }

    state
        .gate
        .enforce_writable(&WriteRequest {
            class_id: Some(existing.class_id),
            hoc_ky: existing.hoc_ky.as_str(),
            nam_hoc: existing.nam_hoc.as_str(),
            actor_role: auth_user.role(),
        })
        .await
        .map_err(AppError::from)?;

    let cancelled = state
        .registrations
        .set_status(id, RegistrationStatus::DaHuy)
        .await
        .map_err(AppError::from)?;

    Ok(RegistrationResponse {
        registration: cancelled,
    })
}

/// The caller's registrations, newest first.
pub async fn list_own_registrations(
    state: &AppState,
    auth_user: &AuthUser,
) -> Result<Vec<Registration>, AppError> {
    let student_id = StudentId::from_uuid(auth_user.user_id()?.into_inner());
    state
        .registrations
        .list_by_student(student_id)
        .await
        .map_err(AppError::from)
}
