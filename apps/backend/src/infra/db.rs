use db_infra::config::db::{DbKind, RuntimeEnv};
use db_infra::{
    build_pool, orchestrate_migration, orchestrate_migration_internal, DbInfraError,
};
use migration::MigrationCommand;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::error::AppError;

impl From<DbInfraError> for AppError {
    fn from(e: DbInfraError) -> Self {
        match e {
            DbInfraError::Config { message } => AppError::config(message),
            DbInfraError::Migration { message } => AppError::internal(message),
        }
    }
}

/// Open the application pool and bring the schema up to date.
///
/// Postgres migrates through a separate owner connection before the app pool
/// opens. SQLite migrates on the app pool itself, which for `SqliteMemory` is
/// the only place the database exists.
pub async fn bootstrap_db(env: RuntimeEnv, db_kind: DbKind) -> Result<DatabaseConnection, AppError> {
    match db_kind {
        DbKind::Postgres => {
            orchestrate_migration(env, db_kind, MigrationCommand::Up).await?;
            let pool = build_pool(env, db_kind).await?;
            info!(?env, ?db_kind, "database ready");
            Ok(pool)
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            let pool = build_pool(env, db_kind).await?;
            orchestrate_migration_internal(&pool, MigrationCommand::Up).await?;
            info!(?env, ?db_kind, "database ready");
            Ok(pool)
        }
    }
}
