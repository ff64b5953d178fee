//! Per-request writability decisions.
//!
//! The gate is a pure read over the lock store: given the targeted class and
//! period plus the actor's role, it answers `Allow` or `Block` with enough
//! structure for the caller to render a precise denial. A class-scoped
//! record takes precedence over a global record for the same period; a
//! period nobody ever locked is open. Which roles may bypass closed periods
//! is configuration, not code.

use crate::error::ClosureError;
use crate::store::LockStore;
use chrono::{DateTime, Utc};
use meritbook_models::{
    AcademicPeriod, AcademicYear, ClassId, ClosureRecord, ClosureState, LockScope, Semester,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;
use utoipa::ToSchema;

/// A mutating request's period coordinates, as supplied by the caller.
///
/// `hoc_ky`/`nam_hoc` arrive raw; the gate validates them against the
/// canonical format and rejects violations as a caller bug rather than
/// guessing.
#[derive(Debug, Clone)]
pub struct WriteRequest<'a> {
    pub class_id: Option<ClassId>,
    pub hoc_ky: &'a str,
    pub nam_hoc: &'a str,
    pub actor_role: &'a str,
}

/// Why a write was blocked: which lock matched, for which period, and in
/// what state.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BlockDetails {
    pub scope: LockScope,
    pub hoc_ky: Semester,
    pub nam_hoc: AcademicYear,
    /// Compact period label used in messages, e.g. `HK1_2025`.
    pub semester_key: String,
    pub state: ClosureState,
    pub grace_until: Option<DateTime<Utc>>,
}

impl BlockDetails {
    fn from_record(record: &ClosureRecord) -> Self {
        let period = record.period();
        Self {
            scope: record.scope(),
            hoc_ky: record.hoc_ky,
            nam_hoc: record.nam_hoc.clone(),
            semester_key: period.storage_key(),
            state: record.state,
            grace_until: record.grace_until,
        }
    }
}

/// Outcome of a writability check.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "decision", rename_all = "UPPERCASE")]
pub enum Decision {
    Allow,
    Block(BlockDetails),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Read-side enforcement of semester locks.
pub struct WriteGate {
    store: Arc<dyn LockStore>,
    /// Role names allowed to write into closed periods.
    override_roles: HashSet<String>,
}

impl WriteGate {
    pub fn new(store: Arc<dyn LockStore>, override_roles: HashSet<String>) -> Self {
        Self {
            store,
            override_roles,
        }
    }

    /// Decide whether the described mutation may proceed.
    ///
    /// Returns a value rather than raising on denial so callers can branch;
    /// only malformed period input is an error.
    pub async fn check_writable(
        &self,
        request: &WriteRequest<'_>,
    ) -> Result<Decision, ClosureError> {
        let period = AcademicPeriod::from_parts(request.hoc_ky, request.nam_hoc)?;

        if self.override_roles.contains(request.actor_role) {
            debug!(role = request.actor_role, %period, "lock check bypassed by override role");
            return Ok(Decision::Allow);
        }

        // class lock first; only fall back to the global record when the
        // class has none of its own
        let record = match request.class_id {
            Some(class_id) => {
                let class_scope = LockScope::class(class_id);
                match self.store.get(&class_scope, &period).await? {
                    Some(record) => Some(record),
                    None => self.store.get(&LockScope::Global, &period).await?,
                }
            }
            None => self.store.get(&LockScope::Global, &period).await?,
        };

        match record {
            Some(record) if record.is_closed_at(Utc::now()) => {
                let details = BlockDetails::from_record(&record);
                debug!(semester = %details.semester_key, state = ?details.state, "write blocked");
                Ok(Decision::Block(details))
            }
            _ => Ok(Decision::Allow),
        }
    }

    /// Guard form wired into write-path entry points: denial becomes a typed
    /// error carrying the decision details.
    pub async fn enforce_writable(
        &self,
        request: &WriteRequest<'_>,
    ) -> Result<(), ClosureError> {
        match self.check_writable(request).await? {
            Decision::Allow => Ok(()),
            Decision::Block(details) => Err(ClosureError::PeriodLocked(details)),
        }
    }
}
