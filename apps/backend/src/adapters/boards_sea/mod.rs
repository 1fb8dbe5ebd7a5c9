//! SeaORM adapter for boards - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::entities::boards;
use crate::entities::NumberList;

pub mod dto;

pub use dto::{BoardCreate, BoardQuery};

pub async fn create_board<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: BoardCreate,
) -> Result<boards::Model, DbErr> {
    let field_count = dto.numbers.len() as i16;
    let remaining_weeks = i32::try_from(dto.remaining_weeks).map_err(|_| {
        DbErr::Custom(format!(
            "remaining_weeks {} does not fit the boards column",
            dto.remaining_weeks
        ))
    })?;
    let board = boards::ActiveModel {
        id: NotSet,
        player_id: Set(dto.player_id),
        round_id: Set(dto.round_id),
        numbers: Set(NumberList(dto.numbers)),
        field_count: Set(field_count),
        cost: Set(dto.cost),
        autoplay: Set(dto.remaining_weeks > 0),
        remaining_weeks: Set(remaining_weeks),
        is_winning: Set(false),
        source_board_id: Set(dto.source_board_id),
        created_at: Set(dto.created_at),
    };
    board.insert(conn).await
}

/// All boards of a round in id order.
pub async fn find_by_round<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<boards::Model>, DbErr> {
    boards::Entity::find()
        .filter(boards::Column::RoundId.eq(round_id))
        .order_by_asc(boards::Column::Id)
        .all(conn)
        .await
}

/// Boards of a round that still have continuation weeks left.
pub async fn find_continuing<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    round_id: i64,
) -> Result<Vec<boards::Model>, DbErr> {
    boards::Entity::find()
        .filter(boards::Column::RoundId.eq(round_id))
        .filter(boards::Column::Autoplay.eq(true))
        .filter(boards::Column::RemainingWeeks.gt(0))
        .order_by_asc(boards::Column::Id)
        .all(conn)
        .await
}

/// A player's boards, newest first.
pub async fn find_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    query: BoardQuery,
) -> Result<Vec<boards::Model>, DbErr> {
    let mut select = boards::Entity::find().filter(boards::Column::PlayerId.eq(query.player_id));
    if let Some(round_id) = query.round_id {
        select = select.filter(boards::Column::RoundId.eq(round_id));
    }
    select
        .order_by_desc(boards::Column::Id)
        .limit(query.limit)
        .all(conn)
        .await
}

/// Set the winning flag on the given boards. Returns the number of rows touched.
pub async fn mark_winning<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    board_ids: &[i64],
) -> Result<u64, DbErr> {
    if board_ids.is_empty() {
        return Ok(0);
    }
    let result = boards::Entity::update_many()
        .col_expr(boards::Column::IsWinning, Expr::val(true).into())
        .filter(boards::Column::Id.is_in(board_ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
