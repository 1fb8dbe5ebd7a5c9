pub use sea_orm::{ConnectionTrait, DatabaseConnection};
pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{DatabaseBackend, Statement};

mod m20251004_000001_init;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20251004_000001_init::Migration)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

/// Run a migration command against an already-open connection.
///
/// Used by the CLI, the backend bootstrap and tests alike.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let target = database_label(db).await?;
    let defined = Migrator::migrations().len();
    let applied_before = count_applied_migrations(db).await?;

    tracing::info!(
        command = ?command,
        backend = ?db.get_database_backend(),
        database = %target,
        defined,
        applied = applied_before,
        "migrate=begin"
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    if let Err(e) = result {
        tracing::error!(command = ?command, database = %target, error = %e, "migrate=failed");
        return Err(e);
    }

    if command != MigrationCommand::Status {
        let applied_after = count_applied_migrations(db).await?;
        tracing::info!(command = ?command, applied = applied_after, "migrate=end");
    }
    Ok(())
}

async fn database_label(db: &DatabaseConnection) -> Result<String, DbErr> {
    let backend = db.get_database_backend();
    let sql = match backend {
        DatabaseBackend::Postgres => "SELECT current_database() AS name",
        DatabaseBackend::Sqlite => "SELECT file AS name FROM pragma_database_list WHERE name = 'main'",
        _ => return Ok("<unsupported>".to_string()),
    };

    let row = db
        .query_one(Statement::from_string(backend, sql.to_string()))
        .await?;
    let name = row
        .and_then(|r| r.try_get::<String>("", "name").ok())
        .unwrap_or_default();

    Ok(if name.is_empty() {
        ":memory:".to_string()
    } else {
        name
    })
}

/// Number of applied migrations; 0 when the bookkeeping table does not exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Name of the latest applied migration, if any.
pub async fn latest_migration(db: &DatabaseConnection) -> Result<Option<String>, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.last().map(|m| m.name().to_string())),
        Err(DbErr::Exec(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
