use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{ProcedureRepository, ReservationRepository, ScheduleClosureRepository};
use crate::domain::services::{auth_service::AuthService, booking_service::BookingService};
use crate::infra::repositories::{
    postgres_closure_repo::PostgresClosureRepo, postgres_procedure_repo::PostgresProcedureRepo,
    postgres_reservation_repo::PostgresReservationRepo,
    sqlite_closure_repo::SqliteClosureRepo, sqlite_procedure_repo::SqliteProcedureRepo,
    sqlite_reservation_repo::SqliteReservationRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        build_state(
            config,
            Arc::new(PostgresProcedureRepo::new(pool.clone())),
            Arc::new(PostgresClosureRepo::new(pool.clone())),
            Arc::new(PostgresReservationRepo::new(pool)),
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");
        let pool = connect_sqlite(database_url).await;
        run_sqlite_migrations(&pool).await;
        sqlite_state(config, pool)
    }
}

pub async fn connect_sqlite(database_url: &str) -> SqlitePool {
    let opts = SqliteConnectOptions::from_str(database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite")
}

/// Wires the SQLite repositories into a state. The pool must already be migrated.
pub fn sqlite_state(config: &Config, pool: SqlitePool) -> AppState {
    build_state(
        config,
        Arc::new(SqliteProcedureRepo::new(pool.clone())),
        Arc::new(SqliteClosureRepo::new(pool.clone())),
        Arc::new(SqliteReservationRepo::new(pool)),
    )
}

fn build_state(
    config: &Config,
    procedure_repo: Arc<dyn ProcedureRepository>,
    closure_repo: Arc<dyn ScheduleClosureRepository>,
    reservation_repo: Arc<dyn ReservationRepository>,
) -> AppState {
    let booking_service = Arc::new(BookingService::new(
        procedure_repo.clone(),
        closure_repo.clone(),
        reservation_repo.clone(),
        config,
    ));

    AppState {
        config: config.clone(),
        procedure_repo,
        closure_repo,
        reservation_repo,
        auth_service: Arc::new(AuthService::new(config.clone())),
        booking_service,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
