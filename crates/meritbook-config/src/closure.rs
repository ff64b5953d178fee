use std::env;

/// Semester-closure policy.
#[derive(Clone, Debug)]
pub struct ClosureConfig {
    /// Directory holding the per-class lock state files.
    pub data_dir: String,
    /// Soft-lock grace window before writes are actually refused.
    pub grace_hours: i64,
    /// Role names allowed to write into closed periods. Policy lives here,
    /// not in the gate.
    pub override_roles: Vec<String>,
}

impl ClosureConfig {
    pub fn from_env() -> Self {
        let override_roles = env::var("CLOSURE_OVERRIDE_ROLES")
            .unwrap_or_else(|_| "ADMIN".to_string())
            .split(',')
            .map(|role| role.trim().to_string())
            .filter(|role| !role.is_empty())
            .collect();

        Self {
            data_dir: env::var("CLOSURE_DATA_DIR")
                .unwrap_or_else(|_| "./data/semesters".to_string()),
            grace_hours: env::var("CLOSURE_GRACE_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(72),
            override_roles,
        }
    }
}
