use std::str::FromStr;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::error::AppError;

/// Handle to the single logical store. Constructed explicitly at startup and
/// passed down; nothing in the crate reaches for a global connection.
#[derive(Clone)]
pub enum Database {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            info!("Initializing PostgreSQL connection...");

            let opts: PgConnectOptions = database_url.parse()
                .map_err(|e| AppError::InternalWithMsg(format!("Invalid Postgres URL: {}", e)))?;
            let opts = opts.log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect_with(opts)
                .await?;

            Ok(Database::Postgres(pool))
        } else {
            info!("Initializing SQLite connection with WAL Mode...");

            let opts = SqliteConnectOptions::from_str(database_url)
                .map_err(|e| AppError::InternalWithMsg(format!("Invalid SQLite connection string: {}", e)))?
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(SqliteJournalMode::Wal)
                .busy_timeout(Duration::from_secs(5))
                .log_statements(LevelFilter::Debug)
                .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

            let pool = SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(opts)
                .await?;

            Ok(Database::Sqlite(pool))
        }
    }

    pub async fn migrate(&self) -> Result<(), AppError> {
        let result = match self {
            Database::Postgres(pool) => sqlx::migrate!("./migrations/postgres").run(pool).await,
            Database::Sqlite(pool) => sqlx::migrate!("./migrations/sqlite").run(pool).await,
        };
        result.map_err(|e| AppError::InternalWithMsg(format!("Migration failed: {}", e)))
    }

    pub async fn close(&self) {
        match self {
            Database::Postgres(pool) => pool.close().await,
            Database::Sqlite(pool) => pool.close().await,
        }
        info!("Database connections closed");
    }
}
