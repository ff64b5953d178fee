use anyhow::anyhow;
use tracing::instrument;

use meritbook_authz::{AuthzService, PermissionSet, RawPermissions, RoleStore};
use meritbook_core::{AppError, PaginationMeta};
use meritbook_models::roles::{
    PaginatedRolesResponse, RoleFilterParams, RoleResponse, permission_name_is_valid,
};
use meritbook_models::{Role, RoleId};

/// Administrative input must be well-formed `<resource>.<action>` names;
/// only legacy *stored* data gets the lenient normalization treatment.
fn ensure_valid_permission_names<'a, I>(names: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = &'a str>,
{
    for name in names {
        if !permission_name_is_valid(name) {
            return Err(AppError::unprocessable(anyhow!(
                "Permission `{name}` must be <resource>.<action>"
            )));
        }
    }
    Ok(())
}

/// Project a stored role into the API shape: whatever legacy payload it
/// carries, the response always shows the canonical permission list.
fn role_response(role: Role) -> RoleResponse {
    let permissions = PermissionSet::normalize(RawPermissions::from(role.permissions));
    RoleResponse {
        id: role.id,
        name: role.name,
        description: role.description,
        permissions: permissions.to_vec(),
        created_at: role.created_at,
        updated_at: role.updated_at,
    }
}

#[instrument(skip(authz, params))]
pub async fn list_roles(
    authz: &AuthzService,
    params: RoleFilterParams,
) -> Result<PaginatedRolesResponse, AppError> {
    let limit = params.pagination.limit();
    let offset = params.pagination.offset();

    let (roles, total) = authz
        .store()
        .list(params.search.as_deref(), limit, offset)
        .await
        .map_err(AppError::internal)?;

    let data: Vec<RoleResponse> = roles.into_iter().map(role_response).collect();
    let meta = PaginationMeta::new(&params.pagination, data.len(), total);

    Ok(PaginatedRolesResponse { data, meta })
}

#[instrument(skip(authz))]
pub async fn get_role(authz: &AuthzService, id: RoleId) -> Result<RoleResponse, AppError> {
    let role = authz
        .store()
        .get(id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(anyhow!("Role not found")))?;
    Ok(role_response(role))
}

/// Replace the role's entire permission set. The write collapses any legacy
/// stored shape into the canonical array.
#[instrument(skip(authz, permissions))]
pub async fn replace_permissions(
    authz: &AuthzService,
    id: RoleId,
    permissions: Vec<String>,
) -> Result<RoleResponse, AppError> {
    ensure_valid_permission_names(permissions.iter().map(String::as_str))?;
    authz
        .replace(id, &permissions)
        .await
        .map_err(AppError::from)?;
    get_role(authz, id).await
}

#[instrument(skip(authz))]
pub async fn grant_permission(
    authz: &AuthzService,
    id: RoleId,
    permission: &str,
) -> Result<RoleResponse, AppError> {
    ensure_valid_permission_names([permission])?;
    authz.grant(id, permission).await.map_err(AppError::from)?;
    get_role(authz, id).await
}

#[instrument(skip(authz))]
pub async fn revoke_permission(
    authz: &AuthzService,
    id: RoleId,
    permission: &str,
) -> Result<RoleResponse, AppError> {
    ensure_valid_permission_names([permission])?;
    authz.revoke(id, permission).await.map_err(AppError::from)?;
    get_role(authz, id).await
}
