use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use meritbook_closure::{BlockDetails, Decision};
use meritbook_core::{PaginationMeta, PaginationParams};
use meritbook_models::registrations::{CreateRegistrationDto, RegistrationResponse};
use meritbook_models::roles::{
    PaginatedRolesResponse, PermissionChangeDto, ReplacePermissionsDto, RoleResponse,
};
use meritbook_models::{
    ClosureRecord, ClosureState, LockLevel, LockScope, Registration, RegistrationStatus, Role,
    Semester,
};

use crate::modules::semesters::model::{
    CheckWritableDto, CurrentPeriodResponse, SemesterActionDto, StatusQuery,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::roles::controller::get_roles,
        crate::modules::roles::controller::get_role,
        crate::modules::roles::controller::replace_permissions,
        crate::modules::roles::controller::grant_permission,
        crate::modules::roles::controller::revoke_permission,
        crate::modules::semesters::controller::get_current_period,
        crate::modules::semesters::controller::get_class_status,
        crate::modules::semesters::controller::propose_close,
        crate::modules::semesters::controller::soft_lock,
        crate::modules::semesters::controller::rollback,
        crate::modules::semesters::controller::hard_lock,
        crate::modules::semesters::controller::check_writable,
        crate::modules::registrations::controller::create_registration,
        crate::modules::registrations::controller::cancel_registration,
        crate::modules::registrations::controller::list_own_registrations,
    ),
    components(
        schemas(
            Role,
            RoleResponse,
            PaginatedRolesResponse,
            ReplacePermissionsDto,
            PermissionChangeDto,
            PaginationMeta,
            PaginationParams,
            Semester,
            ClosureRecord,
            ClosureState,
            LockLevel,
            LockScope,
            Decision,
            BlockDetails,
            StatusQuery,
            SemesterActionDto,
            CheckWritableDto,
            CurrentPeriodResponse,
            Registration,
            RegistrationStatus,
            CreateRegistrationDto,
            RegistrationResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Roles", description = "Role and permission administration"),
        (name = "Semesters", description = "Semester closure state and write gate"),
        (name = "Registrations", description = "Activity registrations")
    ),
    info(
        title = "Meritbook API",
        description = "Extracurricular-activity and conduct-scoring management API",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
