use chrono::Utc;
use tracing::instrument;

use meritbook_closure::{Decision, WriteRequest};
use meritbook_core::AppError;
use meritbook_models::{AcademicPeriod, ClassId, ClosureRecord, LockScope};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

use super::model::{CheckWritableDto, CurrentPeriodResponse};

/// Resolve an optional combined period value, falling back to the period the
/// current date falls into.
pub fn resolve_period(value: Option<&str>) -> Result<AcademicPeriod, AppError> {
    match value {
        Some(raw) => {
            AcademicPeriod::parse(raw).map_err(|e| AppError::invalid_period(e.to_string()))
        }
        None => Ok(AcademicPeriod::from_date(Utc::now().date_naive())),
    }
}

pub fn current_period() -> CurrentPeriodResponse {
    let period = AcademicPeriod::from_date(Utc::now().date_naive());
    CurrentPeriodResponse {
        value: period.to_string(),
        semester_key: period.storage_key(),
        hoc_ky: period.hoc_ky,
        nam_hoc: period.nam_hoc,
    }
}

#[instrument(skip(state))]
pub async fn class_status(
    state: &AppState,
    class_id: ClassId,
    semester: Option<&str>,
) -> Result<ClosureRecord, AppError> {
    let period = resolve_period(semester)?;
    state
        .closure
        .status(LockScope::class(class_id), &period)
        .await
        .map_err(AppError::from)
}

#[instrument(skip(state, auth_user))]
pub async fn propose_close(
    state: &AppState,
    auth_user: &AuthUser,
    class_id: ClassId,
    semester: Option<&str>,
) -> Result<ClosureRecord, AppError> {
    let period = resolve_period(semester)?;
    state
        .closure
        .propose_close(LockScope::class(class_id), &period, auth_user.user_id()?)
        .await
        .map_err(AppError::from)
}

#[instrument(skip(state, auth_user))]
pub async fn soft_lock(
    state: &AppState,
    auth_user: &AuthUser,
    class_id: ClassId,
    semester: Option<&str>,
) -> Result<ClosureRecord, AppError> {
    let period = resolve_period(semester)?;
    state
        .closure
        .soft_lock(LockScope::class(class_id), &period, auth_user.user_id()?)
        .await
        .map_err(AppError::from)
}

#[instrument(skip(state))]
pub async fn rollback(
    state: &AppState,
    class_id: ClassId,
    semester: Option<&str>,
) -> Result<ClosureRecord, AppError> {
    let period = resolve_period(semester)?;
    state
        .closure
        .rollback(LockScope::class(class_id), &period)
        .await
        .map_err(AppError::from)
}

#[instrument(skip(state, auth_user))]
pub async fn hard_lock(
    state: &AppState,
    auth_user: &AuthUser,
    class_id: ClassId,
    semester: Option<&str>,
) -> Result<ClosureRecord, AppError> {
    let period = resolve_period(semester)?;
    state
        .closure
        .hard_lock(LockScope::class(class_id), &period, auth_user.user_id()?)
        .await
        .map_err(AppError::from)
}

/// Preflight: answer the decision the gate would make for this write,
/// without raising on denial.
#[instrument(skip(state, auth_user, dto))]
pub async fn check_writable(
    state: &AppState,
    auth_user: &AuthUser,
    dto: CheckWritableDto,
) -> Result<Decision, AppError> {
    let class_id = dto.class_id.or_else(|| auth_user.class_id());
    state
        .gate
        .check_writable(&WriteRequest {
            class_id,
            hoc_ky: &dto.hoc_ky,
            nam_hoc: &dto.nam_hoc,
            actor_role: auth_user.role(),
        })
        .await
        .map_err(AppError::from)
}
