//! Error codes for the pool backend API.
//!
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that appear
//! in problem-details responses. Add new codes here; never pass ad-hoc strings.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    InvalidFieldCount,
    InvalidWinningNumbers,
    InvalidAmount,
    InvalidRoundId,
    InvalidPlayerId,
    ValidationError,
    BadRequest,

    // Resource not found
    RoundNotFound,
    PlayerNotFound,
    NotFound,

    // Round state and ledger conflicts
    NoActiveRound,
    RoundAlreadyActive,
    RoundMismatch,
    InsufficientBalance,
    OptimisticLock,
    Conflict,

    // Database constraint violations
    UniqueViolation,
    FkViolation,
    CheckViolation,

    // System errors
    DbError,
    DbUnavailable,
    DbTimeout,
    DataCorruption,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFieldCount => "INVALID_FIELD_COUNT",
            Self::InvalidWinningNumbers => "INVALID_WINNING_NUMBERS",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::InvalidRoundId => "INVALID_ROUND_ID",
            Self::InvalidPlayerId => "INVALID_PLAYER_ID",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::RoundNotFound => "ROUND_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::NoActiveRound => "NO_ACTIVE_ROUND",
            Self::RoundAlreadyActive => "ROUND_ALREADY_ACTIVE",
            Self::RoundMismatch => "ROUND_MISMATCH",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::UniqueViolation => "UNIQUE_VIOLATION",
            Self::FkViolation => "FK_VIOLATION",
            Self::CheckViolation => "CHECK_VIOLATION",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    #[cfg(test)]
    pub(crate) const ALL: &'static [ErrorCode] = &[
        Self::InvalidFieldCount,
        Self::InvalidWinningNumbers,
        Self::InvalidAmount,
        Self::InvalidRoundId,
        Self::InvalidPlayerId,
        Self::ValidationError,
        Self::BadRequest,
        Self::RoundNotFound,
        Self::PlayerNotFound,
        Self::NotFound,
        Self::NoActiveRound,
        Self::RoundAlreadyActive,
        Self::RoundMismatch,
        Self::InsufficientBalance,
        Self::OptimisticLock,
        Self::Conflict,
        Self::UniqueViolation,
        Self::FkViolation,
        Self::CheckViolation,
        Self::DbError,
        Self::DbUnavailable,
        Self::DbTimeout,
        Self::DataCorruption,
        Self::Internal,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
