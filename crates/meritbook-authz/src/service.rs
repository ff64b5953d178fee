//! The request-facing authorization service.
//!
//! Ties the role store, the permission cache, and the synonym table into the
//! flow every guarded request runs: resolve the actor's role to a canonical
//! permission set, then check the required capability. Administrative edits
//! (grant/revoke/replace) write the canonical shape back and invalidate the
//! cached entry so the change is visible on the next request.

use crate::cache::PermissionCache;
use crate::error::AuthzError;
use crate::resolver::{PermissionSet, RawPermissions};
use crate::store::RoleStore;
use crate::synonyms::SynonymTable;
use meritbook_models::RoleId;
use std::sync::Arc;
use tracing::{instrument, warn};

pub struct AuthzService {
    store: Arc<dyn RoleStore>,
    cache: PermissionCache,
    synonyms: SynonymTable,
}

impl AuthzService {
    pub fn new(store: Arc<dyn RoleStore>, cache: PermissionCache) -> Self {
        Self {
            store,
            cache,
            synonyms: SynonymTable::default(),
        }
    }

    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn store(&self) -> &Arc<dyn RoleStore> {
        &self.store
    }

    /// Canonical permission set for a role, served from cache when fresh.
    ///
    /// An unknown role resolves to the empty set rather than an error: a
    /// dangling role reference must deny, not 500.
    #[instrument(skip(self))]
    pub async fn permissions_for_role(
        &self,
        role_id: RoleId,
    ) -> Result<PermissionSet, AuthzError> {
        if let Some(hit) = self.cache.get(role_id) {
            return Ok(hit);
        }

        let set = match self.store.get(role_id).await? {
            Some(role) => {
                let raw_was_present = !role.permissions.is_null();
                let set = PermissionSet::normalize(RawPermissions::from(role.permissions));
                if set.is_empty() && raw_was_present {
                    warn!(role = %role.name, "stored permissions normalized to empty set");
                }
                set
            }
            None => {
                warn!(%role_id, "permission check against unknown role");
                PermissionSet::default()
            }
        };

        self.cache.insert(role_id, set.clone());
        Ok(set)
    }

    /// Does the role hold `required`? Pure check, no error on denial.
    pub async fn check(&self, role_id: RoleId, required: &str) -> Result<bool, AuthzError> {
        let set = self.permissions_for_role(role_id).await?;
        Ok(set.allows(&self.synonyms, required))
    }

    /// Guard form: denial is a typed error carrying the required permission
    /// and what the role actually holds.
    pub async fn require(&self, role_id: RoleId, required: &str) -> Result<(), AuthzError> {
        let set = self.permissions_for_role(role_id).await?;
        if set.allows(&self.synonyms, required) {
            return Ok(());
        }
        Err(AuthzError::PermissionDenied {
            required: required.to_string(),
            held: set.to_vec(),
        })
    }

    /// Add a permission and persist the canonical set. Idempotent.
    #[instrument(skip(self))]
    pub async fn grant(
        &self,
        role_id: RoleId,
        permission: &str,
    ) -> Result<PermissionSet, AuthzError> {
        let mut set = self.load_for_edit(role_id).await?;
        set.grant(permission);
        self.persist(role_id, &set).await?;
        Ok(set)
    }

    /// Remove the literal permission (no synonym expansion) and persist.
    #[instrument(skip(self))]
    pub async fn revoke(
        &self,
        role_id: RoleId,
        permission: &str,
    ) -> Result<PermissionSet, AuthzError> {
        let mut set = self.load_for_edit(role_id).await?;
        set.revoke(permission);
        self.persist(role_id, &set).await?;
        Ok(set)
    }

    /// Replace the whole set with the given permissions.
    #[instrument(skip(self, permissions))]
    pub async fn replace(
        &self,
        role_id: RoleId,
        permissions: &[String],
    ) -> Result<PermissionSet, AuthzError> {
        // ensure the role exists before writing
        self.load_for_edit(role_id).await?;
        let set = PermissionSet::from_names(permissions);
        self.persist(role_id, &set).await?;
        Ok(set)
    }

    /// Read-for-edit path: bypasses the cache and fails on unknown roles,
    /// unlike the request-time resolve.
    async fn load_for_edit(&self, role_id: RoleId) -> Result<PermissionSet, AuthzError> {
        let role = self
            .store
            .get(role_id)
            .await?
            .ok_or(AuthzError::RoleNotFound(role_id))?;
        Ok(PermissionSet::normalize(RawPermissions::from(
            role.permissions,
        )))
    }

    async fn persist(&self, role_id: RoleId, set: &PermissionSet) -> Result<(), AuthzError> {
        self.store.save_permissions(role_id, &set.to_vec()).await?;
        self.cache.invalidate(role_id);
        Ok(())
    }
}
