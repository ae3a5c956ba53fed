pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection};
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};

mod m20250901_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20250901_000001_init::Migration)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl std::str::FromStr for MigrationCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "fresh" => Ok(Self::Fresh),
            "reset" => Ok(Self::Reset),
            "refresh" => Ok(Self::Refresh),
            "status" => Ok(Self::Status),
            other => Err(format!(
                "Unknown command: {other}. Use: up | down | fresh | reset | refresh | status"
            )),
        }
    }
}

/// Run a migration command against an already-open connection.
/// Used by the CLI, the state builder, and tests.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let before = get_db_diagnostics(db).await?;

    tracing::info!(command = ?command, backend = %before.backend, db = %before.name, "migration starting");
    tracing::info!(
        defined = before.defined_migrations_count,
        applied = before.applied_count,
        "migration state before"
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            // Status does not change state
            if command != MigrationCommand::Status {
                let after = get_db_diagnostics(db).await?;
                tracing::info!(
                    defined = after.defined_migrations_count,
                    applied = after.applied_count,
                    "migration state after"
                );
            }
            tracing::info!(command = ?command, backend = %before.backend, "migration ok");
            Ok(())
        }
        Err(e) => {
            tracing::error!(command = ?command, backend = %before.backend, error = %e, "migration failed");
            Err(e)
        }
    }
}

#[derive(Debug)]
struct DbDiagnostics {
    backend: String,
    name: String,
    applied_count: usize,
    defined_migrations_count: usize,
}

async fn get_db_diagnostics(db: &DatabaseConnection) -> Result<DbDiagnostics, DbErr> {
    let backend = db.get_database_backend();

    let sql = match backend {
        DatabaseBackend::Postgres => Some("SELECT current_database() AS name"),
        DatabaseBackend::Sqlite => Some("SELECT file AS name FROM pragma_database_list WHERE name = 'main'"),
        _ => None,
    };

    let name = match sql {
        Some(sql) => match db
            .query_one(Statement::from_string(backend, sql.to_string()))
            .await?
        {
            Some(row) => match row.try_get::<String>("", "name") {
                Ok(file) if file.is_empty() => ":memory:".to_string(),
                Ok(name) => name,
                Err(_) => "<unknown>".to_string(),
            },
            None => "<unknown>".to_string(),
        },
        None => "<unsupported>".to_string(),
    };

    Ok(DbDiagnostics {
        backend: format!("{backend:?}"),
        name,
        applied_count: count_applied_migrations(db).await.unwrap_or(0),
        defined_migrations_count: Migrator::migrations().len(),
    })
}

/// Count the migrations applied to the database.
/// Returns 0 if the migration table doesn't exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Name of the latest applied migration, if any.
pub async fn get_latest_migration_version(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
