//! Typed authorization errors and their HTTP mapping.

use crate::store::StoreError;
use meritbook_core::AppError;
use meritbook_models::RoleId;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    /// The role does not hold the required capability, exactly or through a
    /// synonym. Carries what was required and what the role holds so the
    /// caller can render a precise message.
    #[error("missing required permission: {required}")]
    PermissionDenied {
        required: String,
        held: Vec<String>,
    },

    /// Administrative operations on a role that does not exist.
    #[error("role {0} not found")]
    RoleNotFound(RoleId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthzError> for AppError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::PermissionDenied { required, held } => {
                AppError::forbidden(format!("Missing required permission: {required}"))
                    .with_details(json!({
                        "required": required,
                        "held": held,
                    }))
            }
            AuthzError::RoleNotFound(id) => {
                AppError::not_found(anyhow::anyhow!("Role {id} not found"))
            }
            AuthzError::Store(err) => AppError::internal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_permission_denied_maps_to_403_with_details() {
        let err = AuthzError::PermissionDenied {
            required: "attendance.write".to_string(),
            held: vec!["attendance.view".to_string()],
        };
        let app: AppError = err.into();
        assert_eq!(app.status, StatusCode::FORBIDDEN);
        assert_eq!(app.code, "PERMISSION_DENIED");
        assert_eq!(
            app.details.as_ref().unwrap()["required"],
            "attendance.write"
        );
    }

    #[test]
    fn test_role_not_found_maps_to_404() {
        let app: AppError = AuthzError::RoleNotFound(RoleId::new()).into();
        assert_eq!(app.status, StatusCode::NOT_FOUND);
    }
}
