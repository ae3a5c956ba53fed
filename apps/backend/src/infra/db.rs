use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbOwner, DbProfile};
use crate::error::AppError;

// An in-memory SQLite database lives exactly as long as its connection, so the
// pool holds a single connection that is never reaped.
const IN_MEMORY_CONN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

fn connect_options(profile: DbProfile, url: String) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    opts.sqlx_logging(false);

    match profile {
        DbProfile::InMemory => {
            opts.max_connections(1)
                .min_connections(1)
                .idle_timeout(IN_MEMORY_CONN_LIFETIME)
                .max_lifetime(IN_MEMORY_CONN_LIFETIME);
        }
        DbProfile::Prod | DbProfile::Test => {
            opts.max_connections(10)
                .min_connections(1)
                .connect_timeout(Duration::from_secs(5))
                .acquire_timeout(Duration::from_secs(5));
        }
    }
    opts
}

/// Connect to the database for `profile` as `owner`. Does NOT run migrations.
pub async fn connect_db(
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(profile, owner)?;
    let conn = Database::connect(connect_options(profile, url)).await?;
    info!(profile = ?profile, owner = ?owner, "database connected");
    Ok(conn)
}

/// Connect and bring the schema up to date.
pub async fn bootstrap_db(
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(profile, owner).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    Ok(conn)
}
