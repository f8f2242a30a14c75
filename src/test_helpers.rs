use std::sync::Arc;

use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

use crate::{
    config::{AppConfig, AuthConfig},
    routes::router,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-secret";

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.auth = Some(AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        admin_email: "admin@example.com".to_string(),
        admin_password: "admin-password".to_string(),
    });
    cfg
}

pub fn test_state(db: DatabaseConnection) -> Arc<AppState> {
    AppState::new(test_config(), db)
}

/// Router over an empty mock database; enough for routes that fail before
/// touching the store.
pub fn test_router() -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    router(test_state(db))
}
