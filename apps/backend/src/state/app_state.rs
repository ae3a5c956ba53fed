use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;

/// Application state shared across workers through `web::Data`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection pool; absent only in tests that never touch storage
    db: Option<DatabaseConnection>,
    /// JWT signing settings
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
        }
    }

    pub fn new_without_db(security: SecurityConfig) -> Self {
        Self { db: None, security }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
