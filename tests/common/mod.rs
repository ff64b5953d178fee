use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use meritbook::cli::default_role_permissions;
use meritbook::modules::registrations::store::InMemoryRegistrationStore;
use meritbook::router::init_router;
use meritbook::state::AppState;
use meritbook_auth::create_access_token;
use meritbook_authz::{AuthzService, InMemoryRoleStore, PermissionCache};
use meritbook_closure::{ClosureService, InMemoryLockStore, WriteGate};
use meritbook_config::{CorsConfig, JwtConfig};
use meritbook_models::{ClassId, Role, RoleId, UserId};

/// The seeded system roles, by id.
#[allow(dead_code)]
pub struct SeededRoles {
    pub admin: RoleId,
    pub teacher: RoleId,
    pub monitor: RoleId,
    pub student: RoleId,
}

/// A router wired to in-memory stores, plus handles into those stores for
/// seeding and asserting.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub roles: Arc<InMemoryRoleStore>,
    pub locks: Arc<InMemoryLockStore>,
    pub registrations: Arc<InMemoryRegistrationStore>,
    pub jwt: JwtConfig,
    pub seeded: SeededRoles,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

fn seed_role(store: &InMemoryRoleStore, name: &str, description: &str) -> RoleId {
    let permissions =
        default_role_permissions(name).expect("system roles have default permission sets");
    store.insert(Role::new(name, Some(description), &permissions))
}

pub fn build_test_app() -> TestApp {
    let roles = Arc::new(InMemoryRoleStore::new());
    let seeded = SeededRoles {
        admin: seed_role(&roles, "ADMIN", "System administrator"),
        teacher: seed_role(&roles, "GIANG_VIEN", "Teacher"),
        monitor: seed_role(&roles, "LOP_TRUONG", "Class monitor"),
        student: seed_role(&roles, "SINH_VIEN", "Student"),
    };

    let locks = Arc::new(InMemoryLockStore::new());
    let registrations = Arc::new(InMemoryRegistrationStore::new());
    let jwt = test_jwt_config();

    let state = AppState {
        authz: Arc::new(AuthzService::new(
            roles.clone(),
            PermissionCache::new(Duration::from_secs(60)),
        )),
        gate: Arc::new(WriteGate::new(
            locks.clone(),
            ["ADMIN".to_string()].into_iter().collect(),
        )),
        closure: Arc::new(ClosureService::new(locks.clone(), registrations.clone(), 72)),
        registrations: registrations.clone(),
        jwt_config: jwt.clone(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    };

    TestApp {
        router: init_router(state),
        roles,
        locks,
        registrations,
        jwt,
        seeded,
    }
}

#[allow(dead_code)]
pub fn token_for(
    app: &TestApp,
    user_id: UserId,
    role_name: &str,
    role_id: RoleId,
    class_id: Option<ClassId>,
) -> String {
    create_access_token(
        user_id,
        &format!("{role_name}@test.edu").to_lowercase(),
        role_name,
        role_id,
        class_id,
        &app.jwt,
    )
    .unwrap()
}

/// Send a JSON request through the router and decode the response body.
#[allow(dead_code)]
pub async fn send_json(
    router: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}
