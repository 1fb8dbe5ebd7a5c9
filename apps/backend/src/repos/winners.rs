//! Winner records: written once at settlement, read for round history.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::winners_sea::{self as winners_adapter, WinnerCreate};
use crate::domain::pricing::Money;
use crate::domain::settlement::Payout;
use crate::entities::winners;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct Winner {
    pub id: i64,
    pub round_id: i64,
    pub player_id: i64,
    pub board_id: i64,
    pub payout: Money,
    pub created_at: OffsetDateTime,
}

impl From<winners::Model> for Winner {
    fn from(model: winners::Model) -> Self {
        Self {
            id: model.id,
            round_id: model.round_id,
            player_id: model.player_id,
            board_id: model.board_id,
            payout: model.payout,
            created_at: model.created_at,
        }
    }
}

/// Insert one record per payout and return the stored rows.
pub async fn record_payouts<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    payouts: &[Payout],
    created_at: OffsetDateTime,
) -> Result<Vec<Winner>, DomainError> {
    let rows = payouts
        .iter()
        .map(|p| WinnerCreate {
            round_id,
            player_id: p.player_id,
            board_id: p.board_id,
            payout: p.amount,
        })
        .collect();
    winners_adapter::insert_all(conn, rows, created_at).await?;
    find_by_round(conn, round_id).await
}

pub async fn find_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<Winner>, DomainError> {
    let rows = winners_adapter::find_by_round(conn, round_id).await?;
    Ok(rows.into_iter().map(Winner::from).collect())
}
