//! SeaORM adapter for rounds - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::rounds::{self, RoundStatus};
use crate::entities::NumberList;
use crate::infra::db_errors::{OPTIMISTIC_LOCK_PREFIX, ROUND_NOT_FOUND_PREFIX};

pub mod dto;

pub use dto::{RoundClose, RoundCreate, RoundSettle};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Option<rounds::Model>, DbErr> {
    rounds::Entity::find_by_id(round_id).one(conn).await
}

/// Find a round or fail with a structured `ROUND_NOT_FOUND` error.
pub async fn require_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<rounds::Model, DbErr> {
    find_by_id(conn, round_id)
        .await?
        .ok_or_else(|| DbErr::Custom(format!("{ROUND_NOT_FOUND_PREFIX}{round_id}")))
}

/// The open round, if any. The partial unique index guarantees at most one.
pub async fn find_open<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<rounds::Model>, DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::Status.eq(RoundStatus::Open))
        .one(conn)
        .await
}

/// The most recently closed round. Rounds close in id order since only one is ever open.
pub async fn find_latest_closed<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<rounds::Model>, DbErr> {
    rounds::Entity::find()
        .filter(rounds::Column::Status.eq(RoundStatus::Closed))
        .order_by_desc(rounds::Column::Id)
        .one(conn)
        .await
}

/// Newest rounds first.
pub async fn list_recent<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    limit: u64,
) -> Result<Vec<rounds::Model>, DbErr> {
    rounds::Entity::find()
        .order_by_desc(rounds::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}

pub async fn create_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundCreate,
) -> Result<rounds::Model, DbErr> {
    let round = rounds::ActiveModel {
        id: NotSet,
        status: Set(RoundStatus::Open),
        started_at: Set(dto.started_at),
        ended_at: Set(None),
        winning_numbers: Set(None),
        revenue: Set(0),
        prize_pool: Set(0),
        carried_rollover: Set(dto.carried_rollover),
        rollover_amount: Set(None),
        version: Set(1),
    };
    round.insert(conn).await
}

/// Add `amount` to the revenue of round `round_id` only while it is open.
///
/// Returns `false` when the round is missing or already closed. On Postgres the
/// update holds the round row lock until commit, which orders it against a
/// concurrent close.
pub async fn add_revenue_if_open<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
    amount: i64,
) -> Result<bool, DbErr> {
    let result = rounds::Entity::update_many()
        .col_expr(
            rounds::Column::Revenue,
            Expr::col(rounds::Column::Revenue).add(amount),
        )
        .col_expr(
            rounds::Column::Version,
            Expr::col(rounds::Column::Version).add(1),
        )
        .filter(rounds::Column::Id.eq(round_id))
        .filter(rounds::Column::Status.eq(RoundStatus::Open))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Flip an open round to closed. Returns `false` if it was not open anymore.
pub async fn close_if_open<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundClose,
) -> Result<bool, DbErr> {
    let result = rounds::Entity::update_many()
        .col_expr(rounds::Column::Status, Expr::val(RoundStatus::Closed).into())
        .col_expr(rounds::Column::EndedAt, Expr::val(Some(dto.ended_at)).into())
        .col_expr(
            rounds::Column::WinningNumbers,
            Expr::val(Some(NumberList(dto.winning_numbers))).into(),
        )
        .col_expr(
            rounds::Column::Version,
            Expr::col(rounds::Column::Version).add(1),
        )
        .filter(rounds::Column::Id.eq(dto.round_id))
        .filter(rounds::Column::Status.eq(RoundStatus::Open))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Store prize pool and rollover with an optimistic version check, then refetch.
pub async fn record_settlement<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: RoundSettle,
) -> Result<rounds::Model, DbErr> {
    let result = rounds::Entity::update_many()
        .col_expr(rounds::Column::PrizePool, Expr::val(dto.prize_pool).into())
        .col_expr(
            rounds::Column::RolloverAmount,
            Expr::val(Some(dto.rollover_amount)).into(),
        )
        .col_expr(
            rounds::Column::Version,
            Expr::col(rounds::Column::Version).add(1),
        )
        .filter(rounds::Column::Id.eq(dto.round_id))
        .filter(rounds::Column::Version.eq(dto.expected_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let current = require_round(conn, dto.round_id).await?;
        return Err(DbErr::Custom(format!(
            "{OPTIMISTIC_LOCK_PREFIX}{{\"expected\":{},\"actual\":{}}}",
            dto.expected_version, current.version
        )));
    }

    require_round(conn, dto.round_id).await
}
