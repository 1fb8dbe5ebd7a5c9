//! SeaORM adapter for winner records (insert-only).

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entities::winners;

#[derive(Debug, Clone)]
pub struct WinnerCreate {
    pub round_id: i64,
    pub player_id: i64,
    pub board_id: i64,
    pub payout: i64,
}

pub async fn insert_all<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    rows: Vec<WinnerCreate>,
    created_at: OffsetDateTime,
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }
    let models = rows.into_iter().map(|w| winners::ActiveModel {
        id: NotSet,
        round_id: Set(w.round_id),
        player_id: Set(w.player_id),
        board_id: Set(w.board_id),
        payout: Set(w.payout),
        created_at: Set(created_at),
    });
    winners::Entity::insert_many(models).exec(conn).await?;
    Ok(())
}

pub async fn find_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<winners::Model>, DbErr> {
    winners::Entity::find()
        .filter(winners::Column::RoundId.eq(round_id))
        .order_by_asc(winners::Column::BoardId)
        .all(conn)
        .await
}
