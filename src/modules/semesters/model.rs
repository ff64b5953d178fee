//! HTTP DTOs for the semester-closure endpoints.

use meritbook_models::{AcademicYear, ClassId, Semester};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query selecting the period to inspect; defaults to the period the current
/// date falls into.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct StatusQuery {
    /// Combined period value, e.g. `hoc_ky_1_2025` (legacy separators
    /// accepted)
    pub semester: Option<String>,
}

/// Body for closure transitions; same defaulting as [`StatusQuery`].
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SemesterActionDto {
    pub semester: Option<String>,
}

/// Preflight check: would a write into this period be allowed right now?
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckWritableDto {
    /// Defaults to the caller's own class
    pub class_id: Option<ClassId>,
    #[validate(length(min = 1, message = "hoc_ky is required"))]
    pub hoc_ky: String,
    #[validate(length(min = 1, message = "nam_hoc is required"))]
    pub nam_hoc: String,
}

/// The period the system considers current, derived from the date.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentPeriodResponse {
    pub hoc_ky: Semester,
    pub nam_hoc: AcademicYear,
    /// Combined value, e.g. `hoc_ky_1_2025`
    pub value: String,
    /// Compact label, e.g. `HK1_2025`
    pub semester_key: String,
}
