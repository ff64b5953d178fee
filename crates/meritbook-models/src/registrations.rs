//! Activity registration records and DTOs.
//!
//! A registration ties a student to an activity inside one academic period.
//! Registrations are the representative period-scoped write path: creating
//! or cancelling one is subject to both the permission check and the
//! semester write gate.

use crate::ids::{ActivityId, ClassId, RegistrationId, StudentId};
use crate::periods::{AcademicYear, Semester};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

/// Approval status of a registration, stored as the original snake_case
/// values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Awaiting approval by a teacher or class monitor
    ChoDuyet,
    /// Approved
    DaDuyet,
    /// Rejected
    TuChoi,
    /// Cancelled by the student
    DaHuy,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::ChoDuyet => "cho_duyet",
            RegistrationStatus::DaDuyet => "da_duyet",
            RegistrationStatus::TuChoi => "tu_choi",
            RegistrationStatus::DaHuy => "da_huy",
        }
    }

    /// Statuses that block semester closure: work that is still unresolved.
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            RegistrationStatus::ChoDuyet | RegistrationStatus::TuChoi
        )
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cho_duyet" => Ok(RegistrationStatus::ChoDuyet),
            "da_duyet" => Ok(RegistrationStatus::DaDuyet),
            "tu_choi" => Ok(RegistrationStatus::TuChoi),
            "da_huy" => Ok(RegistrationStatus::DaHuy),
            other => Err(format!("unknown registration status `{other}`")),
        }
    }
}

/// An activity registration.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Registration {
    pub id: RegistrationId,
    pub student_id: StudentId,
    pub activity_id: ActivityId,
    pub class_id: ClassId,
    pub hoc_ky: Semester,
    pub nam_hoc: AcademicYear,
    pub status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
}

/// Request body for registering for an activity.
///
/// Period fields arrive as raw strings and are validated against the
/// canonical format at the handler boundary, not here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRegistrationDto {
    pub activity_id: ActivityId,
    /// Class the registration is scoped to; defaults to the caller's class.
    pub class_id: Option<ClassId>,
    #[validate(length(min = 1, message = "hoc_ky is required"))]
    pub hoc_ky: String,
    #[validate(length(min = 1, message = "nam_hoc is required"))]
    pub nam_hoc: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub registration: Registration,
}
