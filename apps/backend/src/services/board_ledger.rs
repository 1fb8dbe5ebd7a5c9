use sea_orm::DatabaseTransaction;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::domain::numbers::BoardNumbers;
use crate::domain::pricing::{self, Money};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::repos::boards::{self, Board, NewBoard};
use crate::repos::{accounts, rounds};

/// Longest autoplay run a board can carry; the week counter is stored as a signed 32-bit column.
pub const MAX_CONTINUATION_WEEKS: u32 = i32::MAX as u32;

/// A player's request to buy one board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub player_id: i64,
    pub round_id: i64,
    pub numbers: Vec<u8>,
    /// Further rounds this board should be re-entered into; 0 disables autoplay.
    pub continuation_weeks: u32,
}

/// Prices boards and records purchases against the open round.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardLedger;

impl BoardLedger {
    pub fn new() -> Self {
        Self
    }

    pub fn price(&self, field_count: u8) -> Result<Money, DomainError> {
        pricing::price(field_count)
    }

    /// Buy a board in the open round.
    ///
    /// Fails with `NoActiveRound` unless `round_id` is the open round, with
    /// `InvalidFieldCount` for malformed numbers, with a validation error when
    /// `continuation_weeks` exceeds [`MAX_CONTINUATION_WEEKS`] and with
    /// `Insufficient` when the balance does not cover the price.
    pub async fn purchase_board(
        &self,
        txn: &DatabaseTransaction,
        request: PurchaseRequest,
        now: OffsetDateTime,
    ) -> Result<Board, DomainError> {
        match rounds::find_open(txn).await? {
            Some(open) if open.id == request.round_id => {}
            Some(open) => {
                debug!(
                    requested = request.round_id,
                    open = open.id,
                    "Purchase against a round that is not open"
                );
                return Err(DomainError::conflict(
                    ConflictKind::NoActiveRound,
                    format!("Round {} is not the open round", request.round_id),
                ));
            }
            None => return Err(DomainError::no_active_round()),
        }

        let numbers = BoardNumbers::new(&request.numbers)?;
        let cost = self.price(numbers.field_count())?;
        if request.continuation_weeks > MAX_CONTINUATION_WEEKS {
            return Err(DomainError::validation_other(format!(
                "continuation_weeks must be at most {MAX_CONTINUATION_WEEKS}, got {}",
                request.continuation_weeks
            )));
        }

        let board = self
            .enter_board(
                txn,
                NewBoard {
                    player_id: request.player_id,
                    round_id: request.round_id,
                    numbers,
                    cost,
                    remaining_weeks: request.continuation_weeks,
                    source_board_id: None,
                },
                now,
            )
            .await?;

        info!(
            player_id = board.player_id,
            round_id = board.round_id,
            board_id = board.id,
            field_count = board.field_count(),
            cost,
            autoplay = board.autoplay,
            "Board purchased"
        );
        Ok(board)
    }

    /// Debit the player, book the revenue on the round, store the board.
    ///
    /// Shared by purchases and autoplay continuations. The debit runs first so a
    /// failed debit leaves the round untouched.
    pub(crate) async fn enter_board(
        &self,
        txn: &DatabaseTransaction,
        board: NewBoard,
        now: OffsetDateTime,
    ) -> Result<Board, DomainError> {
        accounts::debit(txn, board.player_id, board.cost).await?;

        if !rounds::add_revenue_if_open(txn, board.round_id, board.cost).await? {
            return Err(DomainError::no_active_round());
        }

        boards::create_board(txn, board, now).await
    }

    /// A player's boards, newest first, optionally limited to one round.
    pub async fn list_player_boards(
        &self,
        txn: &DatabaseTransaction,
        player_id: i64,
        round_id: Option<i64>,
        limit: u64,
    ) -> Result<Vec<Board>, DomainError> {
        accounts::require_player(txn, player_id).await?;
        boards::find_for_player(txn, player_id, round_id, limit).await
    }
}
