//! Application error type with HTTP response conversion.
//!
//! Every handler returns `Result<_, AppError>`. The response body uses the
//! envelope the frontend already consumes:
//!
//! ```json
//! { "success": false, "message": "...", "code": "PERMISSION_DENIED", "details": { ... } }
//! ```
//!
//! `details` is only present for denials that carry structured context
//! (which permission was missing, which lock matched).

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: Error,
    pub details: Option<Value>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, code: &'static str, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code,
            error: err.into(),
            details: None,
        }
    }

    /// Attach structured context rendered under `details` in the response.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::internal(anyhow::anyhow!(message))
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            err,
        )
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            anyhow::anyhow!(message),
        )
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "PERMISSION_DENIED",
            anyhow::anyhow!(message),
        )
    }

    /// 423 Locked, raised when a mutation targets a closed academic period.
    pub fn locked(message: String) -> Self {
        Self::new(StatusCode::LOCKED, "PERIOD_LOCKED", anyhow::anyhow!(message))
    }

    /// 400 with a dedicated code: the caller supplied a semester/year value
    /// that violates the canonical format precondition.
    pub fn invalid_period(message: String) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "INVALID_PERIOD_FORMAT",
            anyhow::anyhow!(message),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, error = %self.error, "request failed");
        }

        let mut body = json!({
            "success": false,
            "message": self.error.to_string(),
            "code": self.code,
        });
        if let Some(details) = self.details {
            body["details"] = details;
        }

        (self.status, Json(body)).into_response()
    }
}
