use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use meritbook_auth::{Claims, verify_token};
use meritbook_core::AppError;
use meritbook_models::{ClassId, RoleId, UserId};

use crate::state::AppState;

/// Extractor that validates the bearer JWT and provides the caller's claims.
///
/// Claims identify the user and their role; they deliberately carry no
/// permission list. Capability checks go through the authorization service
/// so administrative changes apply to in-flight sessions.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// The user ID from the token subject.
    pub fn user_id(&self) -> Result<UserId, AppError> {
        self.0
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    /// The role the caller acts under, by name (e.g. `GIANG_VIEN`).
    pub fn role(&self) -> &str {
        &self.0.role
    }

    pub fn role_id(&self) -> RoleId {
        self.0.role_id
    }

    /// The caller's class, for students and class monitors.
    pub fn class_id(&self) -> Option<ClassId> {
        self.0.class_id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Generates a permission-guard extractor: authenticates the caller, then
/// requires their role to hold the given permission (synonym fallback
/// included) before the handler runs.
#[macro_export]
macro_rules! require_permission {
    ($name:ident, $permission:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = meritbook_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                state
                    .authz
                    .require(auth_user.role_id(), $permission)
                    .await
                    .map_err(meritbook_core::AppError::from)?;

                Ok($name(auth_user))
            }
        }
    };
}

// Pre-defined permission extractors for the guarded endpoints

// Roles administration
require_permission!(RequireRolesRead, meritbook_core::permissions::ROLES_READ);
require_permission!(RequireRolesWrite, meritbook_core::permissions::ROLES_WRITE);

// Registrations
require_permission!(
    RequireRegistrationsRead,
    meritbook_core::permissions::REGISTRATIONS_READ
);
require_permission!(
    RequireRegistrationsWrite,
    meritbook_core::permissions::REGISTRATIONS_WRITE
);
require_permission!(
    RequireRegistrationsDelete,
    meritbook_core::permissions::REGISTRATIONS_DELETE
);

// Semester closure administration
require_permission!(
    RequireSystemManage,
    meritbook_core::permissions::SYSTEM_MANAGE
);

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str, class_id: Option<ClassId>) -> Claims {
        Claims {
            sub: UserId::from_u128(7).to_string(),
            email: "test@example.edu".to_string(),
            role: role.to_string(),
            role_id: RoleId::from_u128(1),
            class_id,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_accessors() {
        let class_id = ClassId::new();
        let auth_user = AuthUser(claims("LOP_TRUONG", Some(class_id)));

        assert_eq!(auth_user.user_id().unwrap(), UserId::from_u128(7));
        assert_eq!(auth_user.role(), "LOP_TRUONG");
        assert_eq!(auth_user.role_id(), RoleId::from_u128(1));
        assert_eq!(auth_user.class_id(), Some(class_id));
        assert_eq!(auth_user.email(), "test@example.edu");
    }

    #[test]
    fn test_bad_subject_is_unauthorized() {
        let mut bad = claims("SINH_VIEN", None);
        bad.sub = "not-a-uuid".to_string();
        let auth_user = AuthUser(bad);
        assert!(auth_user.user_id().is_err());
    }
}
