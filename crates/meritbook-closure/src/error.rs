//! Typed closure errors and their HTTP mapping.
//!
//! The denial path (`PeriodLocked`) carries the full block details so the
//! HTTP layer can render a precise message and tests can assert the exact
//! reason; lifecycle misuse maps to 409s with the original error codes.

use crate::gate::BlockDetails;
use meritbook_core::AppError;
use meritbook_models::{ClosureState, PeriodFormatError};
use thiserror::Error;

/// Failures of the lock store and the activity ledger.
#[derive(Debug, Error)]
pub enum ClosureStoreError {
    #[error("lock state I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("lock state is corrupted: {0}")]
    Corrupted(#[from] serde_json::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum ClosureError {
    /// A mutation targeted a closed period.
    #[error("semester {} is closed for writing", .0.semester_key)]
    PeriodLocked(BlockDetails),

    /// Caller supplied hoc_ky/nam_hoc values violating the canonical format.
    #[error(transparent)]
    InvalidPeriod(#[from] PeriodFormatError),

    /// Lifecycle transition attempted on a period that is already locked.
    #[error("semester is already locked ({state:?})")]
    AlreadyLocked { state: ClosureState },

    /// Rollback requested but the period is not soft-locked or closing.
    #[error("semester is not soft-locked ({state:?})")]
    NotSoftLocked { state: ClosureState },

    /// Rollback requested after the soft-lock grace window ended.
    #[error("the soft-lock grace window has expired")]
    GraceExpired,

    /// Soft lock blocked by unresolved registrations.
    #[error("{pending} registrations are still unresolved for this class and semester")]
    ChecklistPending { pending: u64 },

    #[error(transparent)]
    Store(#[from] ClosureStoreError),
}

impl From<ClosureError> for AppError {
    fn from(err: ClosureError) -> Self {
        match err {
            ClosureError::PeriodLocked(details) => {
                let message = format!(
                    "Semester {} is closed for writing ({:?})",
                    details.semester_key, details.state
                );
                let payload = serde_json::to_value(&details).unwrap_or_default();
                AppError::locked(message).with_details(payload)
            }
            ClosureError::InvalidPeriod(err) => AppError::invalid_period(err.to_string()),
            ClosureError::AlreadyLocked { state } => AppError::new(
                axum::http::StatusCode::CONFLICT,
                "ALREADY_LOCKED",
                anyhow::anyhow!("Semester is already locked ({state:?})"),
            ),
            ClosureError::NotSoftLocked { state } => AppError::new(
                axum::http::StatusCode::CONFLICT,
                "NOT_SOFT_LOCKED",
                anyhow::anyhow!("Semester is not soft-locked ({state:?})"),
            ),
            ClosureError::GraceExpired => AppError::new(
                axum::http::StatusCode::CONFLICT,
                "GRACE_EXPIRED",
                anyhow::anyhow!("The soft-lock grace window has expired"),
            ),
            ClosureError::ChecklistPending { pending } => AppError::new(
                axum::http::StatusCode::CONFLICT,
                "CHECKLIST_PENDING_REGISTRATIONS",
                anyhow::anyhow!(
                    "{pending} registrations are still unresolved for this class and semester"
                ),
            ),
            ClosureError::Store(err) => AppError::internal(err),
        }
    }
}
