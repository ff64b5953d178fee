//! Role persistence behind a trait.
//!
//! The authorization service only needs a handful of operations, so they sit
//! behind [`RoleStore`] and the application picks the backend: Postgres in
//! production, in-memory for tests and seeding dry-runs.
//!
//! Permission writes are write-through replacements: whatever legacy shape a
//! role carried, after the first administrative edit it holds the canonical
//! array of strings.

use async_trait::async_trait;
use chrono::Utc;
use meritbook_models::{Role, RoleId};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Conflict(String),
}

#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn get(&self, id: RoleId) -> Result<Option<Role>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError>;

    /// Roles ordered by name, plus the total count for pagination.
    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Role>, i64), StoreError>;

    /// Replace the stored permission payload with the canonical array.
    async fn save_permissions(&self, id: RoleId, permissions: &[String])
    -> Result<(), StoreError>;

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        permissions: &[String],
    ) -> Result<Role, StoreError>;
}

/// Postgres-backed role store.
#[derive(Clone)]
pub struct PgRoleStore {
    pool: PgPool,
}

impl PgRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for PgRoleStore {
    async fn get(&self, id: RoleId) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, description, permissions, created_at, updated_at
             FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, description, permissions, created_at, updated_at
             FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Role>, i64), StoreError> {
        let pattern = search.map(|s| format!("%{s}%"));

        let roles = sqlx::query_as::<_, Role>(
            "SELECT id, name, description, permissions, created_at, updated_at
             FROM roles
             WHERE ($1::text IS NULL OR name ILIKE $1)
             ORDER BY name
             LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM roles WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((roles, total))
    }

    async fn save_permissions(
        &self,
        id: RoleId,
        permissions: &[String],
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE roles SET permissions = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(serde_json::json!(permissions))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        permissions: &[String],
    ) -> Result<Role, StoreError> {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (id, name, description, permissions)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, description, permissions, created_at, updated_at",
        )
        .bind(RoleId::new())
        .bind(name)
        .bind(description)
        .bind(serde_json::json!(permissions))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return StoreError::Conflict(format!("role `{name}` already exists"));
                }
            }
            StoreError::from(e)
        })?;
        Ok(role)
    }
}

/// In-memory role store for tests and offline tooling.
#[derive(Default)]
pub struct InMemoryRoleStore {
    roles: Mutex<HashMap<RoleId, Role>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a prebuilt role, returning its id.
    pub fn insert(&self, role: Role) -> RoleId {
        let id = role.id;
        self.roles.lock().expect("role store poisoned").insert(id, role);
        id
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn get(&self, id: RoleId) -> Result<Option<Role>, StoreError> {
        Ok(self.roles.lock().expect("role store poisoned").get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        Ok(self
            .roles
            .lock()
            .expect("role store poisoned")
            .values()
            .find(|role| role.name == name)
            .cloned())
    }

    async fn list(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Role>, i64), StoreError> {
        let needle = search.map(str::to_lowercase);
        let mut matching: Vec<Role> = self
            .roles
            .lock()
            .expect("role store poisoned")
            .values()
            .filter(|role| match &needle {
                Some(needle) => role.name.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }

    async fn save_permissions(
        &self,
        id: RoleId,
        permissions: &[String],
    ) -> Result<(), StoreError> {
        let mut roles = self.roles.lock().expect("role store poisoned");
        if let Some(role) = roles.get_mut(&id) {
            role.permissions = serde_json::json!(permissions);
            role.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        permissions: &[String],
    ) -> Result<Role, StoreError> {
        let mut roles = self.roles.lock().expect("role store poisoned");
        if roles.values().any(|role| role.name == name) {
            return Err(StoreError::Conflict(format!("role `{name}` already exists")));
        }
        let strs: Vec<&str> = permissions.iter().map(String::as_str).collect();
        let role = Role::new(name, description, &strs);
        roles.insert(role.id, role.clone());
        Ok(role)
    }
}
