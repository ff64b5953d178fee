//! Semester closure records and lock scopes.
//!
//! A closure record tracks the administrative lifecycle of one
//! (scope, semester, year) tuple. Records are created lazily: a period with
//! no stored record is open for writing.

use crate::ids::{ClassId, UserId};
use crate::periods::{AcademicPeriod, AcademicYear, Semester};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle state of a closure record.
///
/// `Closing` still accepts writes (approvals continue until the lock is
/// confirmed); `LockedSoft` accepts writes until its grace deadline passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClosureState {
    Active,
    Closing,
    LockedSoft,
    LockedHard,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockLevel {
    Soft,
    Hard,
}

/// The scope a lock applies to: one class, or every class in the period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LockScope {
    Global,
    Class { class_id: ClassId },
}

impl LockScope {
    pub fn class(class_id: ClassId) -> Self {
        LockScope::Class { class_id }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LockScope::Global => "global",
            LockScope::Class { .. } => "class",
        }
    }

    pub fn class_id(&self) -> Option<ClassId> {
        match self {
            LockScope::Global => None,
            LockScope::Class { class_id } => Some(*class_id),
        }
    }

    /// Directory segment used by the file-backed lock store.
    pub fn storage_segment(&self) -> String {
        match self {
            LockScope::Global => "_global".to_string(),
            LockScope::Class { class_id } => class_id.to_string(),
        }
    }
}

/// Persisted closure state for one (scope, period) tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClosureRecord {
    /// `None` for a global (all classes) record.
    pub class_id: Option<ClassId>,
    pub hoc_ky: Semester,
    pub nam_hoc: AcademicYear,
    pub state: ClosureState,
    pub lock_level: Option<LockLevel>,
    pub proposed_by: Option<UserId>,
    pub closed_by: Option<UserId>,
    pub closed_at: Option<DateTime<Utc>>,
    pub grace_until: Option<DateTime<Utc>>,
    pub version: u32,
    pub snapshot_checksum: Option<String>,
}

impl ClosureRecord {
    /// Default record for a period that has never been touched: open.
    pub fn open(scope: LockScope, period: &AcademicPeriod) -> Self {
        Self {
            class_id: scope.class_id(),
            hoc_ky: period.hoc_ky,
            nam_hoc: period.nam_hoc.clone(),
            state: ClosureState::Active,
            lock_level: None,
            proposed_by: None,
            closed_by: None,
            closed_at: None,
            grace_until: None,
            version: 1,
            snapshot_checksum: None,
        }
    }

    pub fn scope(&self) -> LockScope {
        match self.class_id {
            Some(class_id) => LockScope::Class { class_id },
            None => LockScope::Global,
        }
    }

    pub fn period(&self) -> AcademicPeriod {
        AcademicPeriod::new(self.hoc_ky, self.nam_hoc.clone())
    }

    /// Whether the record denies writes at `now`.
    ///
    /// Hard locks and archived periods always do; a soft lock only once its
    /// grace deadline has passed. `Active` and `Closing` never do.
    pub fn is_closed_at(&self, now: DateTime<Utc>) -> bool {
        match self.state {
            ClosureState::LockedHard | ClosureState::Archived => true,
            ClosureState::LockedSoft => self
                .grace_until
                .map(|deadline| deadline < now)
                .unwrap_or(true),
            ClosureState::Active | ClosureState::Closing => false,
        }
    }
}
