use crate::config::db::{DbOwner, DbProfile};
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    db_profile: Option<DbProfile>,
    db_owner: DbOwner,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            db_profile: None,
            db_owner: DbOwner::App,
        }
    }

    pub fn with_db(mut self, profile: DbProfile) -> Self {
        self.db_profile = Some(profile);
        self
    }

    pub fn with_owner(mut self, owner: DbOwner) -> Self {
        self.db_owner = owner;
        self
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        match self.db_profile {
            Some(profile) => {
                // single entrypoint: connect + migrate
                let conn = bootstrap_db(profile, self.db_owner).await?;
                Ok(AppState::new(conn, self.security_config))
            }
            None => Ok(AppState::new_without_db(self.security_config)),
        }
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
