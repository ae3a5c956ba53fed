use clap::{Parser, ValueEnum};
use migration::{migrate, MigrationCommand};
use recipe_api::config::db::{DbOwner, DbProfile};
use recipe_api::infra::db::connect_db;
use tracing::{error, info};

/// In-memory databases vanish with the process, so only persistent
/// profiles are offered here.
#[derive(Clone, Copy, ValueEnum)]
enum Env {
    Prod,
    Test,
}

impl From<Env> for DbProfile {
    fn from(env: Env) -> Self {
        match env {
            Env::Prod => DbProfile::Prod,
            Env::Test => DbProfile::Test,
        }
    }
}

#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Recipe API database migration tool")]
struct Args {
    /// Migration command: up | down | fresh | reset | refresh | status
    command: MigrationCommand,

    /// Which database to migrate
    #[arg(short, long, value_enum, default_value = "test")]
    env: Env,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,recipe_api=info,sqlx=warn")
        .init();

    let args = Args::parse();
    let profile = DbProfile::from(args.env);

    // Schema changes run with the owner credentials
    let conn = match connect_db(profile, DbOwner::Owner).await {
        Ok(conn) => conn,
        Err(e) => {
            error!(error = %e, "could not connect to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&conn, args.command).await {
        error!(error = %e, "migration failed");
        std::process::exit(1);
    }
    info!(profile = ?profile, "migration finished");
}
