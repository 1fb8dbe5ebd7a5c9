//! SeaORM adapter for accounts and player balances.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, NotSet, QueryFilter, Set,
};
use time::OffsetDateTime;

use crate::entities::accounts::{self, AccountRole};

/// DTO for creating an account.
#[derive(Debug, Clone)]
pub struct AccountCreate {
    pub display_name: String,
    pub role: AccountRole,
    pub balance: i64,
}

pub async fn create_account<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AccountCreate,
) -> Result<accounts::Model, DbErr> {
    let now = OffsetDateTime::now_utc();
    let account = accounts::ActiveModel {
        id: NotSet,
        display_name: Set(dto.display_name),
        role: Set(dto.role),
        balance: Set(dto.balance),
        created_at: Set(now),
        updated_at: Set(now),
    };
    account.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    account_id: i64,
) -> Result<Option<accounts::Model>, DbErr> {
    accounts::Entity::find_by_id(account_id).one(conn).await
}

/// Debit a player only if the balance covers `amount`; check and write are one statement.
///
/// Returns `false` when the player is missing, not a player, or short of funds.
pub async fn debit_if_sufficient<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    amount: i64,
) -> Result<bool, DbErr> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Balance,
            Expr::col(accounts::Column::Balance).sub(amount),
        )
        .col_expr(
            accounts::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(accounts::Column::Id.eq(player_id))
        .filter(accounts::Column::Role.eq(AccountRole::Player))
        .filter(accounts::Column::Balance.gte(amount))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}

/// Add `amount` to a player's balance. Returns `false` if no such player exists.
pub async fn credit<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    amount: i64,
) -> Result<bool, DbErr> {
    let result = accounts::Entity::update_many()
        .col_expr(
            accounts::Column::Balance,
            Expr::col(accounts::Column::Balance).add(amount),
        )
        .col_expr(
            accounts::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(accounts::Column::Id.eq(player_id))
        .filter(accounts::Column::Role.eq(AccountRole::Player))
        .exec(conn)
        .await?;
    Ok(result.rows_affected == 1)
}
