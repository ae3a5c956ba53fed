//! SeaORM -> DomainError translation.
//!
//! Adapters return `sea_orm::DbErr`; repos convert through `map_db_err`,
//! and handlers reach `AppError` via `From<DomainError>`.

use tracing::{error, warn};

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

const SQLITE_UNIQUE_PREFIX: &str = "UNIQUE constraint failed: ";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(&format!("SQLSTATE({code})")) || msg.contains(&format!("code: {code}"))
}

/// First `table.column` named by a SQLite unique violation.
///
/// SQLite lists every column of the index: `UNIQUE constraint failed: tags.user_id, tags.name`.
fn sqlite_unique_target(msg: &str) -> Option<&str> {
    let start = msg.find(SQLITE_UNIQUE_PREFIX)? + SQLITE_UNIQUE_PREFIX.len();
    msg[start..]
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .filter(|s| !s.is_empty())
}

fn conflict_for_sqlite_target(target: &str) -> Option<(ConflictKind, &'static str)> {
    let table = target.split('.').next()?;
    match (table, target) {
        (_, "users.email") => Some((ConflictKind::UniqueEmail, "Email already registered")),
        ("tags", _) => Some((ConflictKind::DuplicateTag, "A tag with this name already exists")),
        ("ingredients", _) => Some((
            ConflictKind::DuplicateIngredient,
            "An ingredient with this name already exists",
        )),
        _ => None,
    }
}

fn conflict_for_postgres_constraint(msg: &str) -> Option<(ConflictKind, &'static str)> {
    if msg.contains("users_email_key") {
        return Some((ConflictKind::UniqueEmail, "Email already registered"));
    }
    if msg.contains("ux_tags_user_id_name") {
        return Some((ConflictKind::DuplicateTag, "A tag with this name already exists"));
    }
    if msg.contains("ux_ingredients_user_id_name") {
        return Some((
            ConflictKind::DuplicateIngredient,
            "An ingredient with this name already exists",
        ));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        if let Some((kind, detail)) =
            sqlite_unique_target(&error_msg).and_then(conflict_for_sqlite_target)
        {
            return DomainError::conflict(kind, detail);
        }
        if let Some((kind, detail)) = conflict_for_postgres_constraint(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation(
            ValidationKind::ForeignKey,
            "Foreign key constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23514") || error_msg.contains("CHECK constraint failed") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Check constraint violation");
        return DomainError::validation(ValidationKind::Check, "Check constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}
