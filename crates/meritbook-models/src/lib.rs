//! # Meritbook Models
//!
//! Domain models and DTOs for the Meritbook API:
//!
//! - [`ids`]: strongly-typed ID newtypes
//! - [`roles`]: roles and their stored permission payloads
//! - [`periods`]: semesters, academic years, and period parsing
//! - [`closure`]: semester closure records and lock scopes
//! - [`registrations`]: activity registration records

pub mod closure;
pub mod ids;
pub mod periods;
pub mod registrations;
pub mod roles;

pub use closure::{ClosureRecord, ClosureState, LockLevel, LockScope};
pub use ids::{ActivityId, ClassId, RegistrationId, RoleId, StudentId, UserId};
pub use periods::{AcademicPeriod, AcademicYear, PeriodFormatError, Semester};
pub use registrations::{Registration, RegistrationStatus};
pub use roles::Role;
