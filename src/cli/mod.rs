//! Administrative maintenance operations.
//!
//! These are the jobs operators run against live data: collapsing legacy
//! permission payloads into the canonical shape, editing a role's
//! permissions by name, and seeding the system roles. They work against any
//! [`RoleStore`] so they can be exercised without a database.

use anyhow::{Context, anyhow};
use meritbook_authz::{PermissionSet, RawPermissions, RoleStore};
use meritbook_core::permissions;

/// Outcome of a `fix-permissions` run.
#[derive(Debug, PartialEq, Eq)]
pub struct FixSummary {
    pub scanned: usize,
    pub rewritten: usize,
}

/// Normalize every role's stored permissions to the canonical array shape.
///
/// Roles already in canonical form are left untouched, so the command is
/// safe to re-run.
pub async fn fix_permissions(store: &dyn RoleStore) -> anyhow::Result<FixSummary> {
    let mut summary = FixSummary {
        scanned: 0,
        rewritten: 0,
    };
    let page_size = 100;
    let mut offset = 0;

    loop {
        let (roles, total) = store.list(None, page_size, offset).await?;
        if roles.is_empty() {
            break;
        }

        for role in roles {
            summary.scanned += 1;
            let set = PermissionSet::normalize(RawPermissions::from(role.permissions.clone()));
            let canonical = serde_json::json!(set.to_vec());
            if canonical != role.permissions {
                store.save_permissions(role.id, &set.to_vec()).await?;
                summary.rewritten += 1;
            }
        }

        offset += page_size;
        if offset >= total {
            break;
        }
    }

    Ok(summary)
}

/// Grant a permission to a role by name; returns the updated canonical list.
pub async fn grant_permission(
    store: &dyn RoleStore,
    role_name: &str,
    permission: &str,
) -> anyhow::Result<Vec<String>> {
    let role = store
        .find_by_name(role_name)
        .await?
        .ok_or_else(|| anyhow!("role `{role_name}` not found"))?;

    let mut set = PermissionSet::normalize(RawPermissions::from(role.permissions));
    set.grant(permission);
    store
        .save_permissions(role.id, &set.to_vec())
        .await
        .context("failed to persist permissions")?;
    Ok(set.to_vec())
}

/// Revoke the literal permission from a role by name.
pub async fn revoke_permission(
    store: &dyn RoleStore,
    role_name: &str,
    permission: &str,
) -> anyhow::Result<Vec<String>> {
    let role = store
        .find_by_name(role_name)
        .await?
        .ok_or_else(|| anyhow!("role `{role_name}` not found"))?;

    let mut set = PermissionSet::normalize(RawPermissions::from(role.permissions));
    set.revoke(permission);
    store
        .save_permissions(role.id, &set.to_vec())
        .await
        .context("failed to persist permissions")?;
    Ok(set.to_vec())
}

/// Default permission set for each system role.
pub fn default_role_permissions(role_name: &str) -> Option<Vec<&'static str>> {
    match role_name {
        "ADMIN" => Some(permissions::CATALOG.to_vec()),
        "GIANG_VIEN" => Some(vec![
            permissions::PROFILE_READ,
            permissions::PROFILE_UPDATE,
            permissions::ACTIVITIES_READ,
            permissions::ACTIVITIES_WRITE,
            permissions::ACTIVITIES_APPROVE,
            permissions::REGISTRATIONS_READ,
            permissions::ATTENDANCE_READ,
            permissions::ATTENDANCE_WRITE,
            permissions::REPORTS_READ,
            permissions::REPORTS_EXPORT,
            permissions::STUDENTS_READ,
            permissions::SCORES_READ,
            permissions::NOTIFICATIONS_READ,
            permissions::NOTIFICATIONS_WRITE,
        ]),
        "LOP_TRUONG" => Some(vec![
            permissions::PROFILE_READ,
            permissions::PROFILE_UPDATE,
            permissions::ACTIVITIES_READ,
            permissions::REGISTRATIONS_READ,
            permissions::REGISTRATIONS_WRITE,
            permissions::ATTENDANCE_READ,
            permissions::ATTENDANCE_WRITE,
            permissions::CLASSMATES_READ,
            permissions::CLASSMATES_ASSIST,
            permissions::SCORES_READ,
            permissions::NOTIFICATIONS_READ,
            permissions::NOTIFICATIONS_WRITE,
        ]),
        "SINH_VIEN" => Some(vec![
            permissions::PROFILE_READ,
            permissions::PROFILE_UPDATE,
            permissions::ACTIVITIES_READ,
            permissions::REGISTRATIONS_READ,
            permissions::REGISTRATIONS_WRITE,
            permissions::REGISTRATIONS_DELETE,
            permissions::ATTENDANCE_READ,
            permissions::SCORES_READ,
            permissions::NOTIFICATIONS_READ,
        ]),
        _ => None,
    }
}

/// Create the system roles that do not exist yet; returns the created names.
pub async fn seed_roles(store: &dyn RoleStore) -> anyhow::Result<Vec<String>> {
    let mut created = Vec::new();

    for (name, description) in [
        ("ADMIN", "System administrator"),
        ("GIANG_VIEN", "Teacher"),
        ("LOP_TRUONG", "Class monitor"),
        ("SINH_VIEN", "Student"),
    ] {
        if store.find_by_name(name).await?.is_some() {
            continue;
        }
        let defaults = default_role_permissions(name)
            .expect("system roles always have a default permission set");
        let permissions: Vec<String> = defaults.into_iter().map(str::to_string).collect();
        store.create(name, Some(description), &permissions).await?;
        created.push(name.to_string());
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meritbook_authz::InMemoryRoleStore;
    use meritbook_models::Role;
    use serde_json::json;

    fn legacy_role(name: &str, permissions: serde_json::Value) -> Role {
        let mut role = Role::new(name, None, &[]);
        role.permissions = permissions;
        role
    }

    #[tokio::test]
    async fn test_fix_permissions_collapses_legacy_shapes() {
        let store = InMemoryRoleStore::new();
        let nested = store.insert(legacy_role(
            "SINH_VIEN",
            json!({"permissions": ["profile.read", "Profile.Read"]}),
        ));
        let keyed = store.insert(legacy_role(
            "LOP_TRUONG",
            json!({"0": "classmates.read", "1": "classmates.assist"}),
        ));
        store.insert(legacy_role("ADMIN", json!(["system.manage"])));

        let summary = fix_permissions(&store).await.unwrap();
        assert_eq!(
            summary,
            FixSummary {
                scanned: 3,
                rewritten: 2
            }
        );

        let fixed = store.get(nested).await.unwrap().unwrap();
        assert_eq!(fixed.permissions, json!(["profile.read"]));
        let fixed = store.get(keyed).await.unwrap().unwrap();
        assert_eq!(
            fixed.permissions,
            json!(["classmates.assist", "classmates.read"])
        );
    }

    #[tokio::test]
    async fn test_fix_permissions_is_idempotent() {
        let store = InMemoryRoleStore::new();
        store.insert(legacy_role(
            "GIANG_VIEN",
            json!("[\"activities.approve\"]"),
        ));

        let first = fix_permissions(&store).await.unwrap();
        assert_eq!(first.rewritten, 1);

        let second = fix_permissions(&store).await.unwrap();
        assert_eq!(second.rewritten, 0);
    }

    #[tokio::test]
    async fn test_grant_and_revoke_by_name() {
        let store = InMemoryRoleStore::new();
        store.insert(legacy_role("SINH_VIEN", json!(["profile.read"])));

        let updated = grant_permission(&store, "SINH_VIEN", "scores.read")
            .await
            .unwrap();
        assert_eq!(updated, vec!["profile.read", "scores.read"]);

        let updated = revoke_permission(&store, "SINH_VIEN", "profile.read")
            .await
            .unwrap();
        assert_eq!(updated, vec!["scores.read"]);

        assert!(
            grant_permission(&store, "NO_SUCH_ROLE", "a.b")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_seed_roles_skips_existing() {
        let store = InMemoryRoleStore::new();
        store.insert(legacy_role("ADMIN", json!(["system.manage"])));

        let created = seed_roles(&store).await.unwrap();
        assert_eq!(created, vec!["GIANG_VIEN", "LOP_TRUONG", "SINH_VIEN"]);

        let again = seed_roles(&store).await.unwrap();
        assert!(again.is_empty());

        let student = store.find_by_name("SINH_VIEN").await.unwrap().unwrap();
        let set = PermissionSet::normalize(RawPermissions::from(student.permissions));
        assert!(set.contains("registrations.write"));
    }
}
