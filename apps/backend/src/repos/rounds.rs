//! Round repository functions for the domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::rounds_sea::{self as rounds_adapter, RoundClose, RoundCreate, RoundSettle};
use crate::domain::numbers::WinningNumbers;
use crate::domain::pricing::Money;
use crate::entities::rounds;
pub use crate::entities::rounds::RoundStatus;
use crate::errors::domain::{DomainError, InfraErrorKind};

/// Round domain model
///
/// Winning numbers are present exactly when the round is closed; the rollover
/// amount is present once the round has been settled.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub id: i64,
    pub status: RoundStatus,
    pub started_at: OffsetDateTime,
    pub ended_at: Option<OffsetDateTime>,
    pub winning_numbers: Option<WinningNumbers>,
    pub revenue: Money,
    pub prize_pool: Money,
    /// Rollover received from the previous round when this one started.
    pub carried_rollover: Money,
    /// Rollover computed when this round was settled.
    pub rollover_amount: Option<Money>,
    pub version: i32,
}

impl Round {
    pub fn is_open(&self) -> bool {
        self.status == RoundStatus::Open
    }
}

impl TryFrom<rounds::Model> for Round {
    type Error = DomainError;

    fn try_from(model: rounds::Model) -> Result<Self, Self::Error> {
        let winning_numbers = model
            .winning_numbers
            .map(|list| WinningNumbers::new(&list.0))
            .transpose()
            .map_err(|_| {
                DomainError::infra(
                    InfraErrorKind::DataCorruption,
                    format!("Round {} has malformed winning numbers", model.id),
                )
            })?;
        Ok(Self {
            id: model.id,
            status: model.status,
            started_at: model.started_at,
            ended_at: model.ended_at,
            winning_numbers,
            revenue: model.revenue,
            prize_pool: model.prize_pool,
            carried_rollover: model.carried_rollover,
            rollover_amount: model.rollover_amount,
            version: model.version,
        })
    }
}

fn convert(model: Option<rounds::Model>) -> Result<Option<Round>, DomainError> {
    model.map(Round::try_from).transpose()
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Option<Round>, DomainError> {
    convert(rounds_adapter::find_by_id(conn, round_id).await?)
}

/// Any round by id; `NotFound(Round)` if it does not exist.
pub async fn require_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Round, DomainError> {
    Round::try_from(rounds_adapter::require_round(conn, round_id).await?)
}

pub async fn find_open<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<Round>, DomainError> {
    convert(rounds_adapter::find_open(conn).await?)
}

pub async fn find_latest_closed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<Round>, DomainError> {
    convert(rounds_adapter::find_latest_closed(conn).await?)
}

pub async fn list_recent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
) -> Result<Vec<Round>, DomainError> {
    rounds_adapter::list_recent(conn, limit)
        .await?
        .into_iter()
        .map(Round::try_from)
        .collect()
}

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    started_at: OffsetDateTime,
    carried_rollover: Money,
) -> Result<Round, DomainError> {
    let dto = RoundCreate {
        started_at,
        carried_rollover,
    };
    Round::try_from(rounds_adapter::create_round(conn, dto).await?)
}

/// Returns `false` when the round is no longer open.
pub async fn add_revenue_if_open<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    amount: Money,
) -> Result<bool, DomainError> {
    Ok(rounds_adapter::add_revenue_if_open(conn, round_id, amount).await?)
}

/// Returns `false` when the round was not open anymore.
pub async fn close_if_open<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    ended_at: OffsetDateTime,
    winning: &WinningNumbers,
) -> Result<bool, DomainError> {
    let dto = RoundClose {
        round_id,
        ended_at,
        winning_numbers: winning.as_slice().to_vec(),
    };
    Ok(rounds_adapter::close_if_open(conn, dto).await?)
}

pub async fn record_settlement<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round: &Round,
    prize_pool: Money,
    rollover_amount: Money,
) -> Result<Round, DomainError> {
    let dto = RoundSettle {
        round_id: round.id,
        expected_version: round.version,
        prize_pool,
        rollover_amount,
    };
    Round::try_from(rounds_adapter::record_settlement(conn, dto).await?)
}
