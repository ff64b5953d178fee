use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    get_role, get_roles, grant_permission, replace_permissions, revoke_permission,
};

pub fn init_roles_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_roles))
        .route("/{id}", get(get_role))
        .route("/{id}/permissions", put(replace_permissions))
        .route("/{id}/permissions/grant", post(grant_permission))
        .route("/{id}/permissions/revoke", post(revoke_permission))
}
