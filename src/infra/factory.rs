use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::config::Config;
use crate::domain::services::{seed::seed_demo_data, token_service::TokenService};
use crate::error::AppError;
use crate::infra::database::Database;
use crate::infra::repositories::{
    postgres_note_repo::PostgresNoteRepo, postgres_tenant_repo::PostgresTenantRepo,
    postgres_user_repo::PostgresUserRepo,
    sqlite_note_repo::SqliteNoteRepo, sqlite_tenant_repo::SqliteTenantRepo,
    sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

/// Wires repositories for whichever backend `database` points at.
pub fn build_state(config: &Config, database: &Database) -> Result<AppState, AppError> {
    let token_service = Arc::new(TokenService::new(config)?);

    let state = match database {
        Database::Postgres(pool) => AppState {
            config: config.clone(),
            tenant_repo: Arc::new(PostgresTenantRepo::new(pool.clone())),
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            note_repo: Arc::new(PostgresNoteRepo::new(pool.clone())),
            token_service,
            started_at: Instant::now(),
        },
        Database::Sqlite(pool) => AppState {
            config: config.clone(),
            tenant_repo: Arc::new(SqliteTenantRepo::new(pool.clone())),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            note_repo: Arc::new(SqliteNoteRepo::new(pool.clone())),
            token_service,
            started_at: Instant::now(),
        },
    };

    Ok(state)
}

/// Connects, migrates, wires and optionally seeds. The returned `Database`
/// stays with the caller so it can be closed on shutdown.
pub async fn bootstrap_state(config: &Config) -> Result<(AppState, Database), AppError> {
    let database = Database::connect(&config.database_url).await?;
    database.migrate().await?;

    let state = build_state(config, &database)?;

    if config.seed_demo_data {
        let seeded = seed_demo_data(
            state.tenant_repo.as_ref(),
            state.user_repo.as_ref(),
            config.free_plan_note_limit,
        ).await?;
        if !seeded {
            info!("Store already holds tenants, skipping demo seed");
        }
    }

    Ok((state, database))
}
