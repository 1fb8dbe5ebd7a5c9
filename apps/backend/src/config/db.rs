use std::env;

pub use db_infra::config::db::{DbKind, RuntimeEnv};

use crate::error::AppError;

/// Database engine selected by `DB_KIND`; Postgres when unset.
pub fn db_kind_from_env() -> Result<DbKind, AppError> {
    match env::var("DB_KIND") {
        Ok(raw) => raw.parse().map_err(|e| AppError::config(format!("{e}"))),
        Err(_) => Ok(DbKind::Postgres),
    }
}
