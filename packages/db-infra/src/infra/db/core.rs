use std::future::Future;
use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{info, warn};

use crate::config::db::{
    build_connection_settings, make_conn_spec, validate_db_config, DbKind, DbOwner, RuntimeEnv,
};
use crate::error::DbInfraError;

fn get_db_engine(db_kind: DbKind) -> &'static str {
    match db_kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

async fn retry_connection<T, F, Fut>(
    mut connect_fn: F,
    max_attempts: u32,
    interval_ms: u64,
) -> Result<T, DbInfraError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbInfraError>>,
{
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match connect_fn().await {
            Ok(result) => {
                if attempt > 1 {
                    info!(
                        "connection_retry=success attempts={} interval_ms={}",
                        attempt, interval_ms
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                last_error = Some(e);
                if attempt < max_attempts {
                    warn!(
                        "connection_retry=failed attempt={} max_attempts={} interval_ms={}",
                        attempt, max_attempts, interval_ms
                    );
                    tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        DbInfraError::config("no error recorded after max attempts (this should not happen)")
    }))
}

async fn connect(
    db_kind: DbKind,
    opt: ConnectOptions,
    label: &str,
) -> Result<DatabaseConnection, DbInfraError> {
    // Postgres may still be starting next to us; SQLite is local and either opens or not.
    if matches!(db_kind, DbKind::Postgres) {
        let label = label.to_string();
        retry_connection(
            || {
                let opt_clone = opt.clone();
                let label = label.clone();
                async move {
                    Database::connect(opt_clone).await.map_err(|e| {
                        DbInfraError::config(format!("failed to connect to Postgres ({label}): {e}"))
                    })
                }
            },
            5,
            500,
        )
        .await
    } else {
        Database::connect(opt).await.map_err(|e| {
            DbInfraError::config(format!("failed to connect to database ({label}): {e}"))
        })
    }
}

/// Build admin pool for migrations - single connection only
pub async fn build_admin_pool(
    env: RuntimeEnv,
    db_kind: DbKind,
) -> Result<DatabaseConnection, DbInfraError> {
    let url = make_conn_spec(env, db_kind, DbOwner::Owner)?;

    let mut opt = ConnectOptions::new(&url);
    opt.min_connections(1)
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(2))
        .sqlx_logging(false);

    connect(db_kind, opt, "admin pool").await
}

/// Build the shared application pool.
///
/// SQLite pools hold exactly one long-lived connection; for `SqliteMemory` that
/// connection *is* the database, so it must never be reaped.
pub async fn build_pool(
    env: RuntimeEnv,
    db_kind: DbKind,
) -> Result<DatabaseConnection, DbInfraError> {
    let url = make_conn_spec(env, db_kind, DbOwner::App)?;
    let settings = build_connection_settings(db_kind);

    let mut opt = ConnectOptions::new(&url);
    opt.min_connections(settings.pool_min)
        .max_connections(settings.pool_max)
        .acquire_timeout(settings.acquire_timeout())
        .sqlx_logging(false);

    if matches!(db_kind, DbKind::SqliteMemory) {
        let forever = Duration::from_secs(60 * 60 * 24 * 365);
        opt.idle_timeout(forever).max_lifetime(forever);
    }

    let pool = connect(db_kind, opt, "shared pool").await?;
    info!(
        "pool=create engine={} min={} max={} acquire_timeout_ms={}",
        get_db_engine(db_kind),
        settings.pool_min,
        settings.pool_max,
        settings.acquire_timeout_ms
    );
    Ok(pool)
}

/// Sanitize database URL by masking password in connection strings.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((auth_part, host_part)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match auth_part.split_once(':') {
        Some((user, _password)) => format!("{scheme}://{user}:***@{host_part}"),
        None => url.to_string(),
    }
}

/// Connect with owner credentials and run a migration command.
pub async fn orchestrate_migration(
    env: RuntimeEnv,
    db_kind: DbKind,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    validate_db_config(env, db_kind)?;

    let url = make_conn_spec(env, db_kind, DbOwner::Owner)?;
    info!(
        "migrate=start env={:?} db_kind={:?} engine={} url={}",
        env,
        db_kind,
        get_db_engine(db_kind),
        sanitize_db_url(&url)
    );

    let admin_pool = build_admin_pool(env, db_kind).await?;
    orchestrate_migration_internal(&admin_pool, command).await
}

/// Run a migration command on an already-open pool.
pub async fn orchestrate_migration_internal(
    pool: &DatabaseConnection,
    command: MigrationCommand,
) -> Result<(), DbInfraError> {
    migrate(pool, command)
        .await
        .map_err(|e| DbInfraError::Migration {
            message: format!("migration execution failed: {e}"),
        })?;
    info!("migrate=done");
    Ok(())
}
