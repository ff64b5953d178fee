//! Registration persistence and the closure activity ledger.
//!
//! The Postgres store is the production backend; the in-memory store backs
//! the integration tests and doubles as the closure ledger there, since it
//! already knows every registration it holds.

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

use meritbook_closure::error::ClosureStoreError;
use meritbook_closure::lifecycle::ActivityLedger;
use meritbook_closure::snapshot::{ClosureSnapshot, SnapshotActivity};
use meritbook_core::AppError;
use meritbook_models::{
    AcademicPeriod, ClassId, Registration, RegistrationId, RegistrationStatus, StudentId,
};

#[derive(Debug, Error)]
pub enum RegistrationStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored registration is corrupted: {0}")]
    Corrupted(String),
    #[error("an active registration already exists for this student and activity")]
    Duplicate,
    #[error("registration not found")]
    NotFound,
}

impl From<RegistrationStoreError> for AppError {
    fn from(err: RegistrationStoreError) -> Self {
        match err {
            RegistrationStoreError::Duplicate => AppError::new(
                StatusCode::CONFLICT,
                "ALREADY_REGISTERED",
                anyhow::anyhow!("An active registration already exists for this activity"),
            ),
            RegistrationStoreError::NotFound => {
                AppError::not_found(anyhow::anyhow!("Registration not found"))
            }
            other => AppError::internal(other),
        }
    }
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Store a new registration. Fails with [`RegistrationStoreError::Duplicate`]
    /// when the student already has a non-cancelled registration for the
    /// activity.
    async fn create(
        &self,
        registration: Registration,
    ) -> Result<Registration, RegistrationStoreError>;

    async fn get(
        &self,
        id: RegistrationId,
    ) -> Result<Option<Registration>, RegistrationStoreError>;

    async fn set_status(
        &self,
        id: RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Registration, RegistrationStoreError>;

    async fn list_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Registration>, RegistrationStoreError>;
}

// ============ Postgres backend ============

#[derive(Clone)]
pub struct PgRegistrationStore {
    pool: PgPool,
}

impl PgRegistrationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn row_to_registration(row: PgRow) -> Result<Registration, RegistrationStoreError> {
    let hoc_ky: String = row.try_get("hoc_ky")?;
    let nam_hoc: String = row.try_get("nam_hoc")?;
    let status: String = row.try_get("status")?;

    Ok(Registration {
        id: row.try_get("id")?,
        student_id: row.try_get("student_id")?,
        activity_id: row.try_get("activity_id")?,
        class_id: row.try_get("class_id")?,
        hoc_ky: hoc_ky
            .parse()
            .map_err(|e: meritbook_models::PeriodFormatError| {
                RegistrationStoreError::Corrupted(e.to_string())
            })?,
        nam_hoc: nam_hoc
            .parse()
            .map_err(|e: meritbook_models::PeriodFormatError| {
                RegistrationStoreError::Corrupted(e.to_string())
            })?,
        status: status.parse().map_err(RegistrationStoreError::Corrupted)?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl RegistrationStore for PgRegistrationStore {
    async fn create(
        &self,
        registration: Registration,
    ) -> Result<Registration, RegistrationStoreError> {
        let duplicate: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM registrations
                 WHERE student_id = $1 AND activity_id = $2 AND status <> 'da_huy'
             )",
        )
        .bind(registration.student_id)
        .bind(registration.activity_id)
        .fetch_one(&self.pool)
        .await?;
        if duplicate {
            return Err(RegistrationStoreError::Duplicate);
        }

        sqlx::query(
            "INSERT INTO registrations
                 (id, student_id, activity_id, class_id, hoc_ky, nam_hoc, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(registration.id)
        .bind(registration.student_id)
        .bind(registration.activity_id)
        .bind(registration.class_id)
        .bind(registration.hoc_ky.as_str())
        .bind(registration.nam_hoc.as_str())
        .bind(registration.status.as_str())
        .bind(registration.created_at)
        .execute(&self.pool)
        .await?;

        Ok(registration)
    }

    async fn get(
        &self,
        id: RegistrationId,
    ) -> Result<Option<Registration>, RegistrationStoreError> {
        let row = sqlx::query(
            "SELECT id, student_id, activity_id, class_id, hoc_ky, nam_hoc, status, created_at
             FROM registrations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_registration).transpose()
    }

    async fn set_status(
        &self,
        id: RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Registration, RegistrationStoreError> {
        let row = sqlx::query(
            "UPDATE registrations SET status = $2 WHERE id = $1
             RETURNING id, student_id, activity_id, class_id, hoc_ky, nam_hoc, status, created_at",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RegistrationStoreError::NotFound)?;

        row_to_registration(row)
    }

    async fn list_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Registration>, RegistrationStoreError> {
        let rows = sqlx::query(
            "SELECT id, student_id, activity_id, class_id, hoc_ky, nam_hoc, status, created_at
             FROM registrations WHERE student_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_registration).collect()
    }
}

/// Ledger queries the closure service runs before locking a class semester.
#[derive(Clone)]
pub struct PgActivityLedger {
    pool: PgPool,
}

impl PgActivityLedger {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLedger for PgActivityLedger {
    async fn unresolved_registrations(
        &self,
        class_id: ClassId,
        period: &AcademicPeriod,
    ) -> Result<u64, ClosureStoreError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations
             WHERE class_id = $1 AND hoc_ky = $2 AND nam_hoc = $3
               AND status IN ('cho_duyet', 'tu_choi')",
        )
        .bind(class_id)
        .bind(period.hoc_ky.as_str())
        .bind(period.nam_hoc.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ClosureStoreError::Other(e.into()))?;

        Ok(count.max(0) as u64)
    }

    async fn snapshot(
        &self,
        class_id: ClassId,
        period: &AcademicPeriod,
    ) -> Result<ClosureSnapshot, ClosureStoreError> {
        let activities = sqlx::query(
            "SELECT id, name, points FROM activities WHERE hoc_ky = $1 AND nam_hoc = $2
             ORDER BY name",
        )
        .bind(period.hoc_ky.as_str())
        .bind(period.nam_hoc.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ClosureStoreError::Other(e.into()))?
        .into_iter()
        .map(|row| {
            Ok(SnapshotActivity {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                points: row.try_get("points")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()
        .map_err(|e| ClosureStoreError::Other(e.into()))?;

        let registrations = sqlx::query(
            "SELECT id, student_id, activity_id, class_id, hoc_ky, nam_hoc, status, created_at
             FROM registrations WHERE class_id = $1 AND hoc_ky = $2 AND nam_hoc = $3",
        )
        .bind(class_id)
        .bind(period.hoc_ky.as_str())
        .bind(period.nam_hoc.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ClosureStoreError::Other(e.into()))?
        .into_iter()
        .map(row_to_registration)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ClosureStoreError::Other(anyhow::anyhow!(e)))?;

        Ok(ClosureSnapshot {
            class_id,
            hoc_ky: period.hoc_ky,
            nam_hoc: period.nam_hoc.clone(),
            activities,
            registrations,
            generated_at: Utc::now(),
        })
    }
}

// ============ In-memory backend (tests, offline tooling) ============

#[derive(Default)]
pub struct InMemoryRegistrationStore {
    rows: Mutex<HashMap<RegistrationId, Registration>>,
}

impl InMemoryRegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistrationStore {
    async fn create(
        &self,
        registration: Registration,
    ) -> Result<Registration, RegistrationStoreError> {
        let mut rows = self.rows.lock().expect("registration store poisoned");
        let duplicate = rows.values().any(|existing| {
            existing.student_id == registration.student_id
                && existing.activity_id == registration.activity_id
                && existing.status != RegistrationStatus::DaHuy
        });
        if duplicate {
            return Err(RegistrationStoreError::Duplicate);
        }
        rows.insert(registration.id, registration.clone());
        Ok(registration)
    }

    async fn get(
        &self,
        id: RegistrationId,
    ) -> Result<Option<Registration>, RegistrationStoreError> {
        Ok(self
            .rows
            .lock()
            .expect("registration store poisoned")
            .get(&id)
            .cloned())
    }

    async fn set_status(
        &self,
        id: RegistrationId,
        status: RegistrationStatus,
    ) -> Result<Registration, RegistrationStoreError> {
        let mut rows = self.rows.lock().expect("registration store poisoned");
        let registration = rows.get_mut(&id).ok_or(RegistrationStoreError::NotFound)?;
        registration.status = status;
        Ok(registration.clone())
    }

    async fn list_by_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<Registration>, RegistrationStoreError> {
        let mut rows: Vec<Registration> = self
            .rows
            .lock()
            .expect("registration store poisoned")
            .values()
            .filter(|registration| registration.student_id == student_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }
}

#[async_trait]
impl ActivityLedger for InMemoryRegistrationStore {
    async fn unresolved_registrations(
        &self,
        class_id: ClassId,
        period: &AcademicPeriod,
    ) -> Result<u64, ClosureStoreError> {
        let count = self
            .rows
            .lock()
            .expect("registration store poisoned")
            .values()
            .filter(|registration| {
                registration.class_id == class_id
                    && registration.hoc_ky == period.hoc_ky
                    && registration.nam_hoc == period.nam_hoc
                    && registration.status.is_unresolved()
            })
            .count();
        Ok(count as u64)
    }

    async fn snapshot(
        &self,
        class_id: ClassId,
        period: &AcademicPeriod,
    ) -> Result<ClosureSnapshot, ClosureStoreError> {
        let registrations = self
            .rows
            .lock()
            .expect("registration store poisoned")
            .values()
            .filter(|registration| {
                registration.class_id == class_id
                    && registration.hoc_ky == period.hoc_ky
                    && registration.nam_hoc == period.nam_hoc
            })
            .cloned()
            .collect();

        Ok(ClosureSnapshot {
            class_id,
            hoc_ky: period.hoc_ky,
            nam_hoc: period.nam_hoc.clone(),
            activities: vec![],
            registrations,
            generated_at: Utc::now(),
        })
    }
}
