use actix_web::{web, App, HttpServer};
use recipe_api::config::db::{DbOwner, DbProfile};
use recipe_api::infra::state::build_state;
use recipe_api::middleware::cors::cors_middleware;
use recipe_api::middleware::request_trace::RequestTrace;
use recipe_api::middleware::structured_logger::StructuredLogger;
use recipe_api::middleware::trace_span::TraceSpan;
use recipe_api::routes;
use recipe_api::state::security_config::SecurityConfig;
use recipe_api::telemetry;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = match std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
    {
        Ok(port) => port,
        Err(_) => {
            error!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        }
    };

    let jwt = match std::env::var("BACKEND_JWT_SECRET") {
        Ok(jwt) if !jwt.is_empty() => jwt,
        _ => {
            error!("BACKEND_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let security_config = SecurityConfig::new(jwt.as_bytes());

    let app_state = match build_state()
        .with_db(DbProfile::Prod)
        .with_owner(DbOwner::App)
        .with_security(security_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    info!(%host, port, "starting recipe API");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
