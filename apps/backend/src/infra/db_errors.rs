//! SeaORM -> DomainError translation.
//!
//! Adapters return `sea_orm::DbErr`; repos convert through `From<DbErr>` here,
//! and handlers convert `DomainError` to `AppError`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};

/// Structured adapter errors, carried in `DbErr::Custom`.
pub const OPTIMISTIC_LOCK_PREFIX: &str = "OPTIMISTIC_LOCK:";
pub const ROUND_NOT_FOUND_PREFIX: &str = "ROUND_NOT_FOUND:";
pub const PLAYER_NOT_FOUND_PREFIX: &str = "PLAYER_NOT_FOUND:";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract `table.column` from SQLite "UNIQUE constraint failed: table.column".
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    const MARKER: &str = "UNIQUE constraint failed: ";
    let start = error_msg.find(MARKER)? + MARKER.len();
    error_msg[start..].split_whitespace().next()
}

fn map_sqlite_unique(table_column: &str) -> Option<(ConflictKind, &'static str)> {
    match table_column.trim_end_matches(|c: char| c == ',' || c == '"') {
        "rounds.status" => Some((ConflictKind::RoundAlreadyActive, "A round is already open")),
        "boards.source_board_id" => Some((
            ConflictKind::Other("BoardAlreadyContinued".into()),
            "Board was already continued into a later round",
        )),
        "winners.board_id" => Some((
            ConflictKind::Other("WinnerAlreadyRecorded".into()),
            "Winner already recorded for board",
        )),
        _ => None,
    }
}

fn map_postgres_unique(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("ux_rounds_single_open") {
        return Some((ConflictKind::RoundAlreadyActive, "A round is already open"));
    }
    if error_msg.contains("ux_boards_source_board_id") {
        return Some((
            ConflictKind::Other("BoardAlreadyContinued".into()),
            "Board was already continued into a later round",
        ));
    }
    if error_msg.contains("ux_winners_board_id") {
        return Some((
            ConflictKind::Other("WinnerAlreadyRecorded".into()),
            "Winner already recorded for board",
        ));
    }
    None
}

fn parse_id(msg: &str, prefix: &str) -> Option<i64> {
    msg.strip_prefix(prefix)?.trim().parse().ok()
}

/// Translate a `DbErr` into a `DomainError` with a sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(ROUND_NOT_FOUND_PREFIX) => {
            return match parse_id(msg, ROUND_NOT_FOUND_PREFIX) {
                Some(round_id) => DomainError::not_found(
                    NotFoundKind::Round,
                    format!("Round {round_id} not found"),
                ),
                None => DomainError::not_found(NotFoundKind::Round, "Round not found"),
            };
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(PLAYER_NOT_FOUND_PREFIX) => {
            return match parse_id(msg, PLAYER_NOT_FOUND_PREFIX) {
                Some(player_id) => DomainError::not_found(
                    NotFoundKind::Player,
                    format!("Player {player_id} not found"),
                ),
                None => DomainError::not_found(NotFoundKind::Player, "Player not found"),
            };
        }
        sea_orm::DbErr::Custom(msg) if msg.starts_with(OPTIMISTIC_LOCK_PREFIX) => {
            #[derive(serde::Deserialize)]
            struct LockInfo {
                expected: i32,
                actual: i32,
            }

            let json_str = &msg[OPTIMISTIC_LOCK_PREFIX.len()..];
            if let Ok(info) = serde_json::from_str::<LockInfo>(json_str) {
                warn!(
                    expected = info.expected,
                    actual = info.actual,
                    "Optimistic lock conflict detected"
                );
                return DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    format!(
                        "Round was modified concurrently (expected version {}, actual version {})",
                        info.expected, info.actual
                    ),
                );
            }
            warn!("Optimistic lock conflict detected (version info unavailable)");
            return DomainError::conflict(
                ConflictKind::OptimisticLock,
                "Round was modified by another transaction; please retry",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(raw_error = %error_msg, "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(raw_error = %error_msg, "Unique constraint violation");

        if let Some((kind, detail)) =
            extract_sqlite_table_column(&error_msg).and_then(map_sqlite_unique)
        {
            return DomainError::conflict(kind, detail);
        }
        if let Some((kind, detail)) = map_postgres_unique(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(raw_error = %error_msg, "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if mentions_sqlstate(&error_msg, "23514") || error_msg.contains("CHECK constraint failed") {
        warn!(raw_error = %error_msg, "Check constraint violation");
        return DomainError::validation_other("Check constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(raw_error = %error_msg, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(raw_error = %error_msg, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}
