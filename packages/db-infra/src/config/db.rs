use std::env;
use std::str::FromStr;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::error::DbInfraError;

/// Runtime environment the process is configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnv {
    Prod,
    Test,
}

/// Database engine and storage kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    SqliteFile,
    SqliteMemory,
}

impl FromStr for DbKind {
    type Err = DbInfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(DbKind::Postgres),
            "sqlite-file" | "sqlite_file" | "sqlite" => Ok(DbKind::SqliteFile),
            "sqlite-memory" | "sqlite_memory" | "memory" => Ok(DbKind::SqliteMemory),
            other => Err(DbInfraError::config(format!(
                "unknown DB_KIND '{other}' (expected postgres | sqlite-file | sqlite-memory)"
            ))),
        }
    }
}

/// Database owner enum for different access levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbOwner {
    /// Application-level access (limited permissions)
    App,
    /// Owner-level access (full permissions for migrations)
    Owner,
}

/// Pool sizing and acquisition settings for the shared application pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub pool_min: u32,
    pub pool_max: u32,
    pub acquire_timeout_ms: u64,
}

impl ConnectionSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

/// Builds the connection string for the given environment, engine and owner.
///
/// SQLite ignores the owner; the same file is used for migrations and the app pool.
pub fn make_conn_spec(
    env: RuntimeEnv,
    db_kind: DbKind,
    owner: DbOwner,
) -> Result<String, DbInfraError> {
    match db_kind {
        DbKind::Postgres => {
            let host = var_or("POSTGRES_HOST", "localhost");
            let port = var_or("POSTGRES_PORT", "5432");
            let db_name = pg_db_name(env)?;
            let (username, password) = credentials(owner)?;
            Ok(format!(
                "postgresql://{}:{}@{host}:{port}/{db_name}",
                utf8_percent_encode(&username, NON_ALPHANUMERIC),
                utf8_percent_encode(&password, NON_ALPHANUMERIC),
            ))
        }
        DbKind::SqliteFile => Ok(format!("sqlite://{}?mode=rwc", sqlite_file_spec(env))),
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Path of the SQLite database file (`SQLITE_FILE` overrides the per-env default)
pub fn sqlite_file_spec(env: RuntimeEnv) -> String {
    env::var("SQLITE_FILE").unwrap_or_else(|_| match env {
        RuntimeEnv::Prod => "./data/pool.sqlite".to_string(),
        RuntimeEnv::Test => "./data/pool_test.sqlite".to_string(),
    })
}

/// Reject configurations that would point tests at a production database.
pub fn validate_db_config(env: RuntimeEnv, db_kind: DbKind) -> Result<(), DbInfraError> {
    if env == RuntimeEnv::Test && db_kind == DbKind::Postgres {
        pg_db_name(env)?;
    }
    Ok(())
}

/// Pool settings per engine. SQLite gets exactly one connection so that every
/// transaction is serialized and in-memory databases are shared.
pub fn build_connection_settings(db_kind: DbKind) -> ConnectionSettings {
    match db_kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => ConnectionSettings {
            pool_min: 1,
            pool_max: 1,
            acquire_timeout_ms: 5_000,
        },
        DbKind::Postgres => {
            let default_max = (num_cpus::get() as u32 * 2).clamp(4, 32);
            let pool_max = env::var("DB_POOL_MAX")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(default_max);
            ConnectionSettings {
                pool_min: 1,
                pool_max,
                acquire_timeout_ms: 2_000,
            }
        }
    }
}

fn pg_db_name(env: RuntimeEnv) -> Result<String, DbInfraError> {
    match env {
        RuntimeEnv::Prod => must_var("PROD_DB"),
        RuntimeEnv::Test => {
            let db_name = must_var("TEST_DB")?;
            // Enforce safety: test DB must end with "_test"
            if !db_name.ends_with("_test") {
                return Err(DbInfraError::config(format!(
                    "Test profile requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            Ok(db_name)
        }
    }
}

fn credentials(owner: DbOwner) -> Result<(String, String), DbInfraError> {
    match owner {
        DbOwner::App => Ok((must_var("APP_DB_USER")?, must_var("APP_DB_PASSWORD")?)),
        DbOwner::Owner => Ok((
            must_var("POOL_OWNER_USER")?,
            must_var("POOL_OWNER_PASSWORD")?,
        )),
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn must_var(name: &str) -> Result<String, DbInfraError> {
    env::var(name).map_err(|_| {
        DbInfraError::config(format!("Required environment variable '{name}' is not set"))
    })
}
