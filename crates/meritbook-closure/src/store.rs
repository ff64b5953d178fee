//! Lock-state persistence.
//!
//! The production store is file-backed: one JSON document per
//! (scope, period) under a configurable data directory,
//! `<root>/<class-id>/<HK1_2025>/state.json`, with global records under a
//! `_global` segment. Records are small and written whole; last writer wins
//! on concurrent administrative edits, which is accepted for human-triggered
//! operations.

use crate::error::ClosureStoreError;
use async_trait::async_trait;
use meritbook_models::{AcademicPeriod, ClosureRecord, LockScope};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[async_trait]
pub trait LockStore: Send + Sync {
    /// Current record for the scope and period, if one was ever written.
    async fn get(
        &self,
        scope: &LockScope,
        period: &AcademicPeriod,
    ) -> Result<Option<ClosureRecord>, ClosureStoreError>;

    /// Persist a record, replacing any previous one for its scope/period.
    async fn put(&self, record: &ClosureRecord) -> Result<(), ClosureStoreError>;
}

/// File-backed lock store.
pub struct FileLockStore {
    root: PathBuf,
}

impl FileLockStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn state_path(&self, scope: &LockScope, period: &AcademicPeriod) -> PathBuf {
        self.root
            .join(scope.storage_segment())
            .join(period.storage_key())
            .join("state.json")
    }

    fn read_record(path: &Path) -> Result<Option<ClosureRecord>, ClosureStoreError> {
        match fs::read_to_string(path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl LockStore for FileLockStore {
    async fn get(
        &self,
        scope: &LockScope,
        period: &AcademicPeriod,
    ) -> Result<Option<ClosureRecord>, ClosureStoreError> {
        Self::read_record(&self.state_path(scope, period))
    }

    async fn put(&self, record: &ClosureRecord) -> Result<(), ClosureStoreError> {
        let path = self.state_path(&record.scope(), &record.period());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(record)?)?;
        Ok(())
    }
}

/// In-memory lock store for tests.
#[derive(Default)]
pub struct InMemoryLockStore {
    records: Mutex<HashMap<(String, String), ClosureRecord>>,
}

impl InMemoryLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(scope: &LockScope, period: &AcademicPeriod) -> (String, String) {
        (scope.storage_segment(), period.storage_key())
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn get(
        &self,
        scope: &LockScope,
        period: &AcademicPeriod,
    ) -> Result<Option<ClosureRecord>, ClosureStoreError> {
        Ok(self
            .records
            .lock()
            .expect("lock store poisoned")
            .get(&Self::key(scope, period))
            .cloned())
    }

    async fn put(&self, record: &ClosureRecord) -> Result<(), ClosureStoreError> {
        let key = Self::key(&record.scope(), &record.period());
        self.records
            .lock()
            .expect("lock store poisoned")
            .insert(key, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meritbook_models::{ClassId, ClosureState};

    fn period() -> AcademicPeriod {
        AcademicPeriod::parse("hoc_ky_1_2025").unwrap()
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLockStore::new(dir.path());
        let scope = LockScope::class(ClassId::new());

        assert!(store.get(&scope, &period()).await.unwrap().is_none());

        let mut record = ClosureRecord::open(scope, &period());
        record.state = ClosureState::LockedHard;
        record.version = 3;
        store.put(&record).await.unwrap();

        let loaded = store.get(&scope, &period()).await.unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_file_store_separates_scopes_and_periods() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLockStore::new(dir.path());
        let class_scope = LockScope::class(ClassId::new());
        let other_period = AcademicPeriod::parse("hoc_ky_2_2025").unwrap();

        let class_record = ClosureRecord::open(class_scope, &period());
        let global_record = ClosureRecord::open(LockScope::Global, &period());
        store.put(&class_record).await.unwrap();
        store.put(&global_record).await.unwrap();

        assert_eq!(
            store.get(&class_scope, &period()).await.unwrap().unwrap(),
            class_record
        );
        assert_eq!(
            store
                .get(&LockScope::Global, &period())
                .await
                .unwrap()
                .unwrap(),
            global_record
        );
        assert!(
            store
                .get(&class_scope, &other_period)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_file_store_reports_corrupted_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLockStore::new(dir.path());
        let scope = LockScope::Global;

        let path = dir
            .path()
            .join(scope.storage_segment())
            .join(period().storage_key());
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("state.json"), "{ not json").unwrap();

        let err = store.get(&scope, &period()).await.unwrap_err();
        assert!(matches!(err, ClosureStoreError::Corrupted(_)));
    }

    #[tokio::test]
    async fn test_in_memory_store_round_trip() {
        let store = InMemoryLockStore::new();
        let scope = LockScope::class(ClassId::new());

        let record = ClosureRecord::open(scope, &period());
        store.put(&record).await.unwrap();
        assert_eq!(store.get(&scope, &period()).await.unwrap().unwrap(), record);
    }
}
