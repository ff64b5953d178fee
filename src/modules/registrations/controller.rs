use axum::{
    Json,
    extract::{Path, State},
};

use meritbook_core::AppError;
use meritbook_models::Registration;
use meritbook_models::RegistrationId;
use meritbook_models::registrations::{CreateRegistrationDto, RegistrationResponse};

use crate::middleware::auth::{
    RequireRegistrationsDelete, RequireRegistrationsRead, RequireRegistrationsWrite,
};
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::service;

#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = CreateRegistrationDto,
    responses(
        (status = 200, description = "Registration created", body = RegistrationResponse),
        (status = 400, description = "Malformed period or missing class"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing registrations.write permission"),
        (status = 409, description = "Already registered for this activity"),
        (status = 423, description = "Semester is closed for writing")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
pub async fn create_registration(
    State(state): State<AppState>,
    RequireRegistrationsWrite(auth_user): RequireRegistrationsWrite,
    ValidatedJson(dto): ValidatedJson<CreateRegistrationDto>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let response = service::create_registration(&state, &auth_user, dto).await?;
    Ok(Json(response))
}

#[utoipa::path(
    delete,
    path = "/api/registrations/{id}",
    params(
        ("id" = RegistrationId, Path, description = "Registration ID")
    ),
    responses(
        (status = 200, description = "Registration cancelled", body = RegistrationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner or missing permission"),
        (status = 404, description = "Registration not found"),
        (status = 423, description = "Semester is closed for writing")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
pub async fn cancel_registration(
    State(state): State<AppState>,
    RequireRegistrationsDelete(auth_user): RequireRegistrationsDelete,
    Path(id): Path<RegistrationId>,
) -> Result<Json<RegistrationResponse>, AppError> {
    let response = service::cancel_registration(&state, &auth_user, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/registrations/mine",
    responses(
        (status = 200, description = "The caller's registrations", body = [Registration]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Missing registrations.read permission")
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
pub async fn list_own_registrations(
    State(state): State<AppState>,
    RequireRegistrationsRead(auth_user): RequireRegistrationsRead,
) -> Result<Json<Vec<Registration>>, AppError> {
    let registrations = service::list_own_registrations(&state, &auth_user).await?;
    Ok(Json(registrations))
}
