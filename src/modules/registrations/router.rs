use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

use super::controller::{cancel_registration, create_registration, list_own_registrations};

pub fn init_registrations_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_registration))
        .route("/mine", get(list_own_registrations))
        .route("/{id}", delete(cancel_registration))
}
