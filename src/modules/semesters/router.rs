use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    check_writable, get_class_status, get_current_period, hard_lock, propose_close, rollback,
    soft_lock,
};

pub fn init_semesters_router() -> Router<AppState> {
    Router::new()
        .route("/current", get(get_current_period))
        .route("/check-writable", post(check_writable))
        .route("/classes/{class_id}/status", get(get_class_status))
        .route("/classes/{class_id}/propose-close", post(propose_close))
        .route("/classes/{class_id}/soft-lock", post(soft_lock))
        .route("/classes/{class_id}/rollback", post(rollback))
        .route("/classes/{class_id}/hard-lock", post(hard_lock))
}
