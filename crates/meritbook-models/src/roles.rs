//! Role domain model and DTOs.
//!
//! The `permissions` column has accumulated several shapes over the life of
//! the system (plain array, keyed object, JSON-encoded text, and a nested
//! `{ "permissions": [...] }` object), so the entity keeps the raw
//! `serde_json::Value` and normalization happens in the authorization layer.
//! Administrative writes always store the canonical array-of-strings shape.

use crate::ids::RoleId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Role entity as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: RoleId,
    /// Unique role name, e.g. `ADMIN`, `GIANG_VIEN`, `LOP_TRUONG`, `SINH_VIEN`.
    pub name: String,
    pub description: Option<String>,
    /// Raw stored permission payload; any of the legacy shapes.
    #[schema(value_type = Object)]
    pub permissions: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Convenience constructor used by seeds and tests; stores the canonical
    /// array shape.
    pub fn new(name: &str, description: Option<&str>, permissions: &[&str]) -> Self {
        let now = Utc::now();
        Self {
            id: RoleId::new(),
            name: name.to_string(),
            description: description.map(str::to_string),
            permissions: serde_json::json!(permissions),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Whether a permission string has the `<resource>.<action>` shape.
///
/// Checked in the services that accept administrative input; stored legacy
/// data is never validated, only normalized.
pub fn permission_name_is_valid(value: &str) -> bool {
    match value.split_once('.') {
        Some((resource, action)) => !resource.trim().is_empty() && !action.trim().is_empty(),
        None => false,
    }
}

// DTOs

/// Replace a role's entire permission set with the given list.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplacePermissionsDto {
    pub permissions: Vec<String>,
}

/// Grant or revoke a single permission.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PermissionChangeDto {
    #[validate(length(
        min = 3,
        max = 100,
        message = "Permission must be between 3 and 100 characters"
    ))]
    pub permission: String,
}

/// Query parameters for listing roles.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RoleFilterParams {
    /// Case-insensitive search on the role name
    pub search: Option<String>,
    #[serde(flatten)]
    pub pagination: meritbook_core::PaginationParams,
}

/// Role as returned by the API: permissions are always the canonical,
/// ascending-sorted list regardless of the stored shape.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleResponse {
    pub id: RoleId,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedRolesResponse {
    pub data: Vec<RoleResponse>,
    pub meta: meritbook_core::PaginationMeta,
}
