use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::{info, warn};

use super::board_ledger::BoardLedger;
use crate::domain::pricing::Money;
use crate::errors::domain::DomainError;
use crate::repos::boards::{self, Board, NewBoard};
use crate::repos::rounds;

/// What happened to one continuing board.
#[derive(Debug, Clone, PartialEq)]
pub enum ContinuationOutcome {
    Continued {
        source_board_id: i64,
        board: Board,
    },
    /// The player could not pay; the board stops continuing, others are unaffected.
    InsufficientBalance {
        source_board_id: i64,
        player_id: i64,
        cost: Money,
    },
}

/// Result of one autoplay batch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContinuationReport {
    pub round_id: i64,
    /// Closed round the boards were taken from, if there was one.
    pub source_round_id: Option<i64>,
    pub outcomes: Vec<ContinuationOutcome>,
}

impl ContinuationReport {
    pub fn continued(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ContinuationOutcome::Continued { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.continued()
    }
}

/// Re-enters autoplay boards into a newly started round.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoplayCoordinator {
    ledger: BoardLedger,
}

impl AutoplayCoordinator {
    pub fn new() -> Self {
        Self {
            ledger: BoardLedger::new(),
        }
    }

    /// Copy every continuing board of the latest closed round into `new_round_id`.
    ///
    /// Each copy keeps the numbers, costs the regular price, and has one week
    /// less to run. A player who cannot pay loses only that board; any other
    /// failure aborts the batch.
    pub async fn continue_boards(
        &self,
        txn: &DatabaseTransaction,
        new_round_id: i64,
        now: OffsetDateTime,
    ) -> Result<ContinuationReport, DomainError> {
        let mut report = ContinuationReport {
            round_id: new_round_id,
            ..ContinuationReport::default()
        };

        let Some(previous) = rounds::find_latest_closed(txn).await? else {
            return Ok(report);
        };
        report.source_round_id = Some(previous.id);

        for source in boards::find_continuing(txn, previous.id).await? {
            let cost = self.ledger.price(source.field_count())?;
            let next = NewBoard {
                player_id: source.player_id,
                round_id: new_round_id,
                numbers: source.numbers.clone(),
                cost,
                remaining_weeks: source.remaining_weeks.saturating_sub(1),
                source_board_id: Some(source.id),
            };

            match self.ledger.enter_board(txn, next, now).await {
                Ok(board) => report.outcomes.push(ContinuationOutcome::Continued {
                    source_board_id: source.id,
                    board,
                }),
                Err(DomainError::Insufficient(detail)) => {
                    warn!(
                        round_id = new_round_id,
                        player_id = source.player_id,
                        board_id = source.id,
                        cost,
                        detail = %detail,
                        "Autoplay board skipped"
                    );
                    report.outcomes.push(ContinuationOutcome::InsufficientBalance {
                        source_board_id: source.id,
                        player_id: source.player_id,
                        cost,
                    });
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            round_id = new_round_id,
            source_round_id = previous.id,
            continued = report.continued(),
            skipped = report.skipped(),
            "Autoplay boards continued"
        );
        Ok(report)
    }
}
