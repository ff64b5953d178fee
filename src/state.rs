use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use meritbook_authz::{AuthzService, PermissionCache, PgRoleStore};
use meritbook_closure::store::LockStore;
use meritbook_closure::{ClosureService, FileLockStore, WriteGate};
use meritbook_config::{AppConfig, CorsConfig, JwtConfig};

use crate::modules::registrations::store::{PgActivityLedger, PgRegistrationStore, RegistrationStore};

#[derive(Clone)]
pub struct AppState {
    pub authz: Arc<AuthzService>,
    pub gate: Arc<WriteGate>,
    pub closure: Arc<ClosureService>,
    pub registrations: Arc<dyn RegistrationStore>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

pub async fn init_app_state() -> AppState {
    let config = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    let role_store = Arc::new(PgRoleStore::new(pool.clone()));
    let lock_store: Arc<dyn LockStore> = Arc::new(FileLockStore::new(&config.closure.data_dir));
    let ledger = Arc::new(PgActivityLedger::new(pool.clone()));

    AppState {
        authz: Arc::new(AuthzService::new(
            role_store,
            PermissionCache::new(config.authz.cache_ttl),
        )),
        gate: Arc::new(WriteGate::new(
            lock_store.clone(),
            config.closure.override_roles.iter().cloned().collect(),
        )),
        closure: Arc::new(ClosureService::new(
            lock_store,
            ledger,
            config.closure.grace_hours,
        )),
        registrations: Arc::new(PgRegistrationStore::new(pool)),
        jwt_config: config.jwt,
        cors_config: config.cors,
    }
}
