//! Board repository functions for the domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::boards_sea::{self as boards_adapter, BoardCreate, BoardQuery};
use crate::domain::numbers::BoardNumbers;
use crate::domain::pricing::Money;
use crate::domain::settlement::Entry;
use crate::entities::boards;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Board domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub id: i64,
    pub player_id: i64,
    pub round_id: i64,
    pub numbers: BoardNumbers,
    pub cost: Money,
    pub autoplay: bool,
    pub remaining_weeks: u32,
    pub is_winning: bool,
    /// Board this one was continued from, for autoplay entries.
    pub source_board_id: Option<i64>,
    pub created_at: OffsetDateTime,
}

impl Board {
    pub fn field_count(&self) -> u8 {
        self.numbers.field_count()
    }

    pub fn entry(&self) -> Entry {
        Entry {
            board_id: self.id,
            player_id: self.player_id,
            numbers: self.numbers.clone(),
        }
    }
}

impl TryFrom<boards::Model> for Board {
    type Error = DomainError;

    fn try_from(model: boards::Model) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                format!("Board {} has {what}", model.id),
            )
        };
        let numbers = BoardNumbers::new(&model.numbers.0).map_err(|_| corrupt("malformed numbers"))?;
        if i16::from(numbers.field_count()) != model.field_count {
            return Err(corrupt("a field count that disagrees with its numbers"));
        }
        let remaining_weeks =
            u32::try_from(model.remaining_weeks).map_err(|_| corrupt("negative remaining weeks"))?;
        Ok(Self {
            id: model.id,
            player_id: model.player_id,
            round_id: model.round_id,
            numbers,
            cost: model.cost,
            autoplay: model.autoplay,
            remaining_weeks,
            is_winning: model.is_winning,
            source_board_id: model.source_board_id,
            created_at: model.created_at,
        })
    }
}

/// A board about to be entered into a round.
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub player_id: i64,
    pub round_id: i64,
    pub numbers: BoardNumbers,
    pub cost: Money,
    pub remaining_weeks: u32,
    pub source_board_id: Option<i64>,
}

fn convert_all(models: Vec<boards::Model>) -> Result<Vec<Board>, DomainError> {
    models.into_iter().map(Board::try_from).collect()
}

pub async fn create_board<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    board: NewBoard,
    created_at: OffsetDateTime,
) -> Result<Board, DomainError> {
    let dto = BoardCreate {
        player_id: board.player_id,
        round_id: board.round_id,
        numbers: board.numbers.into(),
        cost: board.cost,
        remaining_weeks: board.remaining_weeks,
        source_board_id: board.source_board_id,
        created_at,
    };
    Board::try_from(boards_adapter::create_board(conn, dto).await?)
}

pub async fn find_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<Board>, DomainError> {
    convert_all(boards_adapter::find_by_round(conn, round_id).await?)
}

/// Autoplay boards of `round_id` with weeks left to run.
pub async fn find_continuing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<Board>, DomainError> {
    convert_all(boards_adapter::find_continuing(conn, round_id).await?)
}

pub async fn find_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    round_id: Option<i64>,
    limit: u64,
) -> Result<Vec<Board>, DomainError> {
    let query = BoardQuery {
        player_id,
        round_id,
        limit,
    };
    convert_all(boards_adapter::find_for_player(conn, query).await?)
}

pub async fn mark_winning<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    board_ids: &[i64],
) -> Result<u64, DomainError> {
    Ok(boards_adapter::mark_winning(conn, board_ids).await?)
}
