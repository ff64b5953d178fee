//! Permission constants for the Meritbook API.
//!
//! This module provides centralized permission string constants for use across
//! the codebase. Permissions are dot-namespaced `<resource>.<action>` strings,
//! stored lower-cased; using these constants instead of string literals keeps
//! guards and seeds consistent.
//!
//! # Example
//!
//! ```ignore
//! use meritbook_core::permissions;
//!
//! authz.require(role_id, permissions::ACTIVITIES_APPROVE).await?;
//! ```

// =============================================================================
// Profile permissions
// =============================================================================

/// Permission to read one's own profile
pub const PROFILE_READ: &str = "profile.read";
/// Permission to update one's own profile
pub const PROFILE_UPDATE: &str = "profile.update";

// =============================================================================
// Activities permissions
// =============================================================================

/// Permission to read activities
pub const ACTIVITIES_READ: &str = "activities.read";
/// Permission to create and update activities
pub const ACTIVITIES_WRITE: &str = "activities.write";
/// Permission to delete activities
pub const ACTIVITIES_DELETE: &str = "activities.delete";
/// Permission to approve or reject proposed activities
pub const ACTIVITIES_APPROVE: &str = "activities.approve";

// =============================================================================
// Registrations permissions
// =============================================================================

/// Permission to read activity registrations
pub const REGISTRATIONS_READ: &str = "registrations.read";
/// Permission to create activity registrations
pub const REGISTRATIONS_WRITE: &str = "registrations.write";
/// Permission to cancel/delete activity registrations
pub const REGISTRATIONS_DELETE: &str = "registrations.delete";

// =============================================================================
// Attendance permissions
// =============================================================================

/// Permission to read attendance marks
pub const ATTENDANCE_READ: &str = "attendance.read";
/// Permission to record attendance marks
pub const ATTENDANCE_WRITE: &str = "attendance.write";
/// Permission to delete attendance marks
pub const ATTENDANCE_DELETE: &str = "attendance.delete";

// =============================================================================
// Reports permissions
// =============================================================================

/// Permission to read semester reports
pub const REPORTS_READ: &str = "reports.read";
/// Permission to export semester reports
pub const REPORTS_EXPORT: &str = "reports.export";

// =============================================================================
// Notifications permissions
// =============================================================================

/// Permission to read notifications
pub const NOTIFICATIONS_READ: &str = "notifications.read";
/// Permission to send notifications
pub const NOTIFICATIONS_WRITE: &str = "notifications.write";
/// Permission to delete notifications
pub const NOTIFICATIONS_DELETE: &str = "notifications.delete";

// =============================================================================
// Students permissions
// =============================================================================

/// Permission to read student records
pub const STUDENTS_READ: &str = "students.read";
/// Permission to update student records
pub const STUDENTS_UPDATE: &str = "students.update";

// =============================================================================
// Classmates permissions (class-monitor capabilities)
// =============================================================================

/// Permission to view classmates
pub const CLASSMATES_READ: &str = "classmates.read";
/// Permission to assist with classmate registrations/attendance
pub const CLASSMATES_ASSIST: &str = "classmates.assist";

// =============================================================================
// Scores permissions
// =============================================================================

/// Permission to read conduct scores
pub const SCORES_READ: &str = "scores.read";

// =============================================================================
// Roles permissions
// =============================================================================

/// Permission to read roles and their permission sets
pub const ROLES_READ: &str = "roles.read";
/// Permission to edit role permission sets
pub const ROLES_WRITE: &str = "roles.write";
/// Permission to delete roles
pub const ROLES_DELETE: &str = "roles.delete";

// =============================================================================
// System permissions
// =============================================================================

/// Permission to run administrative operations (semester closure, user admin)
pub const SYSTEM_MANAGE: &str = "system.manage";
/// Permission to change system configuration
pub const SYSTEM_CONFIGURE: &str = "system.configure";

/// The full permission catalog, used for seeding the administrator role and
/// for catalog listings.
pub const CATALOG: &[&str] = &[
    PROFILE_READ,
    PROFILE_UPDATE,
    ACTIVITIES_READ,
    ACTIVITIES_WRITE,
    ACTIVITIES_DELETE,
    ACTIVITIES_APPROVE,
    REGISTRATIONS_READ,
    REGISTRATIONS_WRITE,
    REGISTRATIONS_DELETE,
    ATTENDANCE_READ,
    ATTENDANCE_WRITE,
    ATTENDANCE_DELETE,
    REPORTS_READ,
    REPORTS_EXPORT,
    NOTIFICATIONS_READ,
    NOTIFICATIONS_WRITE,
    NOTIFICATIONS_DELETE,
    STUDENTS_READ,
    STUDENTS_UPDATE,
    CLASSMATES_READ,
    CLASSMATES_ASSIST,
    SCORES_READ,
    ROLES_READ,
    ROLES_WRITE,
    ROLES_DELETE,
    SYSTEM_MANAGE,
    SYSTEM_CONFIGURE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entries_are_canonical() {
        for perm in CATALOG {
            assert_eq!(*perm, perm.to_lowercase(), "{perm} must be lower-cased");
            let parts: Vec<&str> = perm.split('.').collect();
            assert_eq!(parts.len(), 2, "{perm} must be <resource>.<action>");
            assert!(!parts[0].is_empty() && !parts[1].is_empty());
        }
    }

    #[test]
    fn test_catalog_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for perm in CATALOG {
            assert!(seen.insert(*perm), "duplicate catalog entry: {perm}");
        }
    }
}
