use std::env;
use std::str::FromStr;

use crate::error::AppError;

const SQLITE_MEMORY_URL: &str = "sqlite::memory:";

/// Database profile enum for different environments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProfile {
    /// Production PostgreSQL database
    Prod,
    /// Test PostgreSQL database; the name must end in `_test`
    Test,
    /// Private SQLite in-memory database (one per connection pool)
    InMemory,
}

impl FromStr for DbProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prod" => Ok(Self::Prod),
            "test" => Ok(Self::Test),
            "memory" | "in-memory" | "inmemory" => Ok(Self::InMemory),
            other => Err(format!(
                "Unknown database profile: {other}. Use: prod | test | memory"
            )),
        }
    }
}

/// Database owner enum for different access levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application-level access (limited permissions)
    App,
    /// Owner-level access (full permissions for migrations)
    Owner,
}

/// Builds a database URL from environment variables based on profile and owner
pub fn db_url(profile: DbProfile, owner: DbOwner) -> Result<String, AppError> {
    if profile == DbProfile::InMemory {
        return Ok(SQLITE_MEMORY_URL.to_string());
    }

    let host = host();
    let port = port()?;
    let db_name = db_name(profile)?;
    let (username, password) = credentials(owner)?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

/// Database host (defaults to localhost)
fn host() -> String {
    env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string())
}

/// Database port (defaults to 5432)
fn port() -> Result<u16, AppError> {
    match env::var("POSTGRES_PORT") {
        Ok(raw) => raw.parse::<u16>().map_err(|_| {
            AppError::config(format!("POSTGRES_PORT must be a valid port, got: '{raw}'"))
        }),
        Err(_) => Ok(5432),
    }
}

fn db_name(profile: DbProfile) -> Result<String, AppError> {
    match profile {
        DbProfile::Prod => must_var("PROD_DB"),
        DbProfile::Test => {
            let db_name = must_var("TEST_DB")?;
            if !db_name.ends_with("_test") {
                return Err(AppError::config(format!(
                    "Test profile requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
        DbProfile::InMemory => Ok(SQLITE_MEMORY_URL.to_string()),
    }
}

fn credentials(owner: DbOwner) -> Result<(String, String), AppError> {
    match owner {
        DbOwner::App => Ok((must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?)),
        DbOwner::Owner => Ok((
            must_var("RECIPES_OWNER_USER")?,
            must_var("RECIPES_OWNER_PASSWORD")?,
        )),
    }
}

/// Get required environment variable or return error
pub fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
