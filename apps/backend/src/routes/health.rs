use actix_web::{web, HttpResponse};
use migration::get_latest_migration_version;
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub app_version: String,
    pub db: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub db_error: Option<String>,
    pub migrations: String,
    pub time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let app_version = env!("CARGO_PKG_VERSION").to_string();

    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let (db_status, db_error, migrations) = match require_db(&app_state) {
        Ok(db) => {
            // Lightweight round-trip, then the latest applied migration
            match db
                .query_one(sea_orm::Statement::from_string(
                    db.get_database_backend(),
                    "SELECT 1 AS health_check".to_string(),
                ))
                .await
            {
                Ok(_) => {
                    let migration_version = match get_latest_migration_version(db).await {
                        Ok(Some(version)) => version,
                        Ok(None) => "no_migrations".to_string(),
                        Err(_) => "unknown".to_string(),
                    };
                    ("ok".to_string(), None, migration_version)
                }
                Err(e) => (
                    "error".to_string(),
                    Some(format!("DB query failed: {e}")),
                    "unknown".to_string(),
                ),
            }
        }
        Err(e) => (
            "error".to_string(),
            Some(format!("DB unavailable: {e}")),
            "unknown".to_string(),
        ),
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        app_version,
        db: db_status,
        db_error,
        migrations,
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
