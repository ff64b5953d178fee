use axum::{
    Json,
    extract::{Path, Query, State},
};

use meritbook_core::AppError;
use meritbook_models::RoleId;
use meritbook_models::roles::{
    PaginatedRolesResponse, PermissionChangeDto, ReplacePermissionsDto, RoleFilterParams,
    RoleResponse,
};

use crate::middleware::auth::{RequireRolesRead, RequireRolesWrite};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service;

#[utoipa::path(
    get,
    path = "/api/roles",
    params(
        ("search" = Option<String>, Query, description = "Filter by role name"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Roles with canonical permission sets", body = PaginatedRolesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing roles.read permission")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_roles(
    State(state): State<AppState>,
    _guard: RequireRolesRead,
    Query(params): Query<RoleFilterParams>,
) -> Result<Json<PaginatedRolesResponse>, AppError> {
    let response = service::list_roles(&state.authz, params).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(
        ("id" = RoleId, Path, description = "Role ID")
    ),
    responses(
        (status = 200, description = "Role details", body = RoleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing roles.read permission"),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_role(
    State(state): State<AppState>,
    _guard: RequireRolesRead,
    Path(id): Path<RoleId>,
) -> Result<Json<RoleResponse>, AppError> {
    let response = service::get_role(&state.authz, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}/permissions",
    params(
        ("id" = RoleId, Path, description = "Role ID")
    ),
    request_body = ReplacePermissionsDto,
    responses(
        (status = 200, description = "Permission set replaced", body = RoleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing roles.write permission"),
        (status = 404, description = "Role not found"),
        (status = 422, description = "Malformed permission name")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn replace_permissions(
    State(state): State<AppState>,
    _guard: RequireRolesWrite,
    Path(id): Path<RoleId>,
    ValidatedJson(dto): ValidatedJson<ReplacePermissionsDto>,
) -> Result<Json<RoleResponse>, AppError> {
    let response = service::replace_permissions(&state.authz, id, dto.permissions).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/roles/{id}/permissions/grant",
    params(
        ("id" = RoleId, Path, description = "Role ID")
    ),
    request_body = PermissionChangeDto,
    responses(
        (status = 200, description = "Permission granted (idempotent)", body = RoleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing roles.write permission"),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn grant_permission(
    State(state): State<AppState>,
    _guard: RequireRolesWrite,
    Path(id): Path<RoleId>,
    ValidatedJson(dto): ValidatedJson<PermissionChangeDto>,
) -> Result<Json<RoleResponse>, AppError> {
    let response = service::grant_permission(&state.authz, id, &dto.permission).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/roles/{id}/permissions/revoke",
    params(
        ("id" = RoleId, Path, description = "Role ID")
    ),
    request_body = PermissionChangeDto,
    responses(
        (status = 200, description = "Permission revoked (literal match only)", body = RoleResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing roles.write permission"),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn revoke_permission(
    State(state): State<AppState>,
    _guard: RequireRolesWrite,
    Path(id): Path<RoleId>,
    ValidatedJson(dto): ValidatedJson<PermissionChangeDto>,
) -> Result<Json<RoleResponse>, AppError> {
    let response = service::revoke_permission(&state.authz, id, &dto.permission).await?;
    Ok(Json(response))
}
