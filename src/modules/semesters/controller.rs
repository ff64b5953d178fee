use axum::{
    Json,
    extract::{Path, Query, State},
};

use meritbook_closure::Decision;
use meritbook_core::AppError;
use meritbook_models::{ClassId, ClosureRecord};

use crate::middleware::auth::{AuthUser, RequireSystemManage};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{CheckWritableDto, CurrentPeriodResponse, SemesterActionDto, StatusQuery};
use super::service;

#[utoipa::path(
    get,
    path = "/api/semesters/current",
    responses(
        (status = 200, description = "The date-derived current period", body = CurrentPeriodResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
pub async fn get_current_period(
    _auth_user: AuthUser,
) -> Result<Json<CurrentPeriodResponse>, AppError> {
    Ok(Json(service::current_period()))
}

#[utoipa::path(
    get,
    path = "/api/semesters/classes/{class_id}/status",
    params(
        ("class_id" = ClassId, Path, description = "Class ID"),
        ("semester" = Option<String>, Query, description = "Period value, defaults to current")
    ),
    responses(
        (status = 200, description = "Closure state for the class and period", body = ClosureRecord),
        (status = 400, description = "Malformed period value"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
pub async fn get_class_status(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(class_id): Path<ClassId>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ClosureRecord>, AppError> {
    let record = service::class_status(&state, class_id, query.semester.as_deref()).await?;
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/semesters/classes/{class_id}/propose-close",
    params(
        ("class_id" = ClassId, Path, description = "Class ID")
    ),
    request_body = SemesterActionDto,
    responses(
        (status = 200, description = "Closure proposed", body = ClosureRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing system.manage permission"),
        (status = 409, description = "Already locked")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
pub async fn propose_close(
    State(state): State<AppState>,
    RequireSystemManage(auth_user): RequireSystemManage,
    Path(class_id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<SemesterActionDto>,
) -> Result<Json<ClosureRecord>, AppError> {
    let record =
        service::propose_close(&state, &auth_user, class_id, dto.semester.as_deref()).await?;
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/semesters/classes/{class_id}/soft-lock",
    params(
        ("class_id" = ClassId, Path, description = "Class ID")
    ),
    request_body = SemesterActionDto,
    responses(
        (status = 200, description = "Semester soft-locked with a grace window", body = ClosureRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing system.manage permission"),
        (status = 409, description = "Checklist pending or already locked")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
pub async fn soft_lock(
    State(state): State<AppState>,
    RequireSystemManage(auth_user): RequireSystemManage,
    Path(class_id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<SemesterActionDto>,
) -> Result<Json<ClosureRecord>, AppError> {
    let record = service::soft_lock(&state, &auth_user, class_id, dto.semester.as_deref()).await?;
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/semesters/classes/{class_id}/rollback",
    params(
        ("class_id" = ClassId, Path, description = "Class ID")
    ),
    request_body = SemesterActionDto,
    responses(
        (status = 200, description = "Closure rolled back to active", body = ClosureRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing system.manage permission"),
        (status = 409, description = "Not soft-locked or grace expired")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
pub async fn rollback(
    State(state): State<AppState>,
    RequireSystemManage(_auth_user): RequireSystemManage,
    Path(class_id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<SemesterActionDto>,
) -> Result<Json<ClosureRecord>, AppError> {
    let record = service::rollback(&state, class_id, dto.semester.as_deref()).await?;
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/semesters/classes/{class_id}/hard-lock",
    params(
        ("class_id" = ClassId, Path, description = "Class ID")
    ),
    request_body = SemesterActionDto,
    responses(
        (status = 200, description = "Semester hard-locked", body = ClosureRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing system.manage permission")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
pub async fn hard_lock(
    State(state): State<AppState>,
    RequireSystemManage(auth_user): RequireSystemManage,
    Path(class_id): Path<ClassId>,
    ValidatedJson(dto): ValidatedJson<SemesterActionDto>,
) -> Result<Json<ClosureRecord>, AppError> {
    let record = service::hard_lock(&state, &auth_user, class_id, dto.semester.as_deref()).await?;
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/semesters/check-writable",
    request_body = CheckWritableDto,
    responses(
        (status = 200, description = "The gate's decision for this write", body = Decision),
        (status = 400, description = "Malformed period value"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Semesters",
    security(("bearer_auth" = []))
)]
pub async fn check_writable(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CheckWritableDto>,
) -> Result<Json<Decision>, AppError> {
    let decision = service::check_writable(&state, &auth_user, dto).await?;
    Ok(Json(decision))
}
