#![allow(dead_code)]


use recipe_api::config::db::DbProfile;
use recipe_api::error::AppError;
use recipe_api::infra::state::build_state;
use recipe_api::state::app_state::AppState;
use recipe_api::state::security_config::SecurityConfig;

pub use app_builder::create_test_app;

pub const TEST_JWT_SECRET: &str = "recipes-test-secret";

/// Fresh state on a private, migrated SQLite in-memory database.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state()
        .with_db(DbProfile::InMemory)
        .with_security(SecurityConfig::new(TEST_JWT_SECRET))
        .build()
        .await
}
