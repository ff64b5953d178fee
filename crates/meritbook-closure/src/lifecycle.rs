//! The closure state machine.
//!
//! Transitions for one (scope, period) tuple:
//!
//! ```text
//! ACTIVE ──propose──▶ CLOSING ──soft_lock──▶ LOCKED_SOFT ──hard_lock──▶ LOCKED_HARD
//!    ▲                   │                        │
//!    └────rollback───────┴──rollback (in grace)───┘
//! ```
//!
//! Writes keep flowing during `CLOSING` and during the soft-lock grace
//! window; the gate handles that distinction. Soft-locking a class requires
//! its closure checklist to pass (no unresolved registrations) and captures
//! a snapshot whose checksum lands on the record. Every transition bumps the
//! record version.

use crate::error::{ClosureError, ClosureStoreError};
use crate::snapshot::ClosureSnapshot;
use crate::store::LockStore;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use meritbook_models::{
    AcademicPeriod, ClassId, ClosureRecord, ClosureState, LockLevel, LockScope, UserId,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Read access to the activity data a closure covers.
///
/// Implemented against the real database in the application and in memory
/// for tests; the closure crate itself stays persistence-free.
#[async_trait]
pub trait ActivityLedger: Send + Sync {
    /// Registrations still awaiting a decision (pending or rejected) for the
    /// class within the period.
    async fn unresolved_registrations(
        &self,
        class_id: ClassId,
        period: &AcademicPeriod,
    ) -> Result<u64, ClosureStoreError>;

    /// Capture the class's activities and registrations for the period.
    async fn snapshot(
        &self,
        class_id: ClassId,
        period: &AcademicPeriod,
    ) -> Result<ClosureSnapshot, ClosureStoreError>;
}

/// Administrative closure operations. The gate only reads what this writes.
pub struct ClosureService {
    store: Arc<dyn LockStore>,
    ledger: Arc<dyn ActivityLedger>,
    grace_hours: i64,
}

impl ClosureService {
    pub fn new(
        store: Arc<dyn LockStore>,
        ledger: Arc<dyn ActivityLedger>,
        grace_hours: i64,
    ) -> Self {
        Self {
            store,
            ledger,
            grace_hours,
        }
    }

    /// Current record for the scope/period; a never-touched period reads as
    /// an open, unpersisted record.
    pub async fn status(
        &self,
        scope: LockScope,
        period: &AcademicPeriod,
    ) -> Result<ClosureRecord, ClosureError> {
        Ok(self
            .store
            .get(&scope, period)
            .await?
            .unwrap_or_else(|| ClosureRecord::open(scope, period)))
    }

    /// Announce the intent to close: `ACTIVE → CLOSING`. Idempotent when
    /// already closing.
    #[instrument(skip(self))]
    pub async fn propose_close(
        &self,
        scope: LockScope,
        period: &AcademicPeriod,
        actor: UserId,
    ) -> Result<ClosureRecord, ClosureError> {
        let mut record = self.status(scope, period).await?;
        match record.state {
            // a soft lock must be rolled back (inside its grace window), not
            // proposed over; proposing would reopen writes past the deadline
            ClosureState::LockedSoft | ClosureState::LockedHard | ClosureState::Archived => {
                return Err(ClosureError::AlreadyLocked {
                    state: record.state,
                });
            }
            ClosureState::Closing => return Ok(record),
            ClosureState::Active => {}
        }

        record.state = ClosureState::Closing;
        record.proposed_by = Some(actor);
        record.version += 1;
        self.store.put(&record).await?;
        info!(semester = %period.storage_key(), "semester closure proposed");
        Ok(record)
    }

    /// Lock with a grace window. For class scopes the closure checklist must
    /// pass first, and a snapshot checksum is recorded.
    #[instrument(skip(self))]
    pub async fn soft_lock(
        &self,
        scope: LockScope,
        period: &AcademicPeriod,
        actor: UserId,
    ) -> Result<ClosureRecord, ClosureError> {
        let mut record = self.status(scope, period).await?;
        if matches!(
            record.state,
            ClosureState::LockedHard | ClosureState::Archived
        ) {
            return Err(ClosureError::AlreadyLocked {
                state: record.state,
            });
        }

        if let LockScope::Class { class_id } = scope {
            let pending = self
                .ledger
                .unresolved_registrations(class_id, period)
                .await?;
            if pending > 0 {
                return Err(ClosureError::ChecklistPending { pending });
            }
            let snapshot = self.ledger.snapshot(class_id, period).await?;
            record.snapshot_checksum = Some(snapshot.checksum());
        }

        let now = Utc::now();
        record.state = ClosureState::LockedSoft;
        record.lock_level = Some(LockLevel::Soft);
        record.grace_until = Some(now + Duration::hours(self.grace_hours));
        record.closed_by = Some(actor);
        record.closed_at = Some(now);
        record.version += 1;
        self.store.put(&record).await?;
        info!(
            semester = %period.storage_key(),
            grace_hours = self.grace_hours,
            "semester soft-locked"
        );
        Ok(record)
    }

    /// Reopen a closing or soft-locked period. Soft locks can only roll back
    /// while their grace window is still open.
    #[instrument(skip(self))]
    pub async fn rollback(
        &self,
        scope: LockScope,
        period: &AcademicPeriod,
    ) -> Result<ClosureRecord, ClosureError> {
        let mut record = self.status(scope, period).await?;
        match record.state {
            ClosureState::LockedSoft => {
                let expired = record
                    .grace_until
                    .map(|deadline| deadline < Utc::now())
                    .unwrap_or(true);
                if expired {
                    return Err(ClosureError::GraceExpired);
                }
            }
            ClosureState::Closing => {}
            state => return Err(ClosureError::NotSoftLocked { state }),
        }

        record.state = ClosureState::Active;
        record.lock_level = None;
        record.grace_until = None;
        record.closed_by = None;
        record.closed_at = None;
        record.version += 1;
        self.store.put(&record).await?;
        info!(semester = %period.storage_key(), "semester closure rolled back");
        Ok(record)
    }

    /// Terminal lock, from any state.
    #[instrument(skip(self))]
    pub async fn hard_lock(
        &self,
        scope: LockScope,
        period: &AcademicPeriod,
        actor: UserId,
    ) -> Result<ClosureRecord, ClosureError> {
        let mut record = self.status(scope, period).await?;
        record.state = ClosureState::LockedHard;
        record.lock_level = Some(LockLevel::Hard);
        record.grace_until = None;
        record.closed_by = Some(actor);
        record.closed_at = Some(Utc::now());
        record.version += 1;
        self.store.put(&record).await?;
        info!(semester = %period.storage_key(), "semester hard-locked");
        Ok(record)
    }
}
