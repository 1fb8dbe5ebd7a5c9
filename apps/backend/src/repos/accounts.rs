//! Account repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::accounts_sea::{self as accounts_adapter, AccountCreate};
use crate::domain::pricing::{format_money, Money};
use crate::entities::accounts;
use crate::entities::accounts::AccountRole as DbAccountRole;
use crate::errors::domain::{DomainError, NotFoundKind};

/// What an account can do. Only players hold a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Player { balance: Money },
    Admin,
}

/// Account domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: i64,
    pub display_name: String,
    pub role: AccountRole,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

impl Account {
    pub fn balance(&self) -> Option<Money> {
        match self.role {
            AccountRole::Player { balance } => Some(balance),
            AccountRole::Admin => None,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, AccountRole::Player { .. })
    }
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        let role = match model.role {
            DbAccountRole::Player => AccountRole::Player {
                balance: model.balance,
            },
            DbAccountRole::Admin => AccountRole::Admin,
        };
        Self {
            id: model.id,
            display_name: model.display_name,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn player_not_found(player_id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Player, format!("Player {player_id} not found"))
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    display_name: &str,
    balance: Money,
) -> Result<Account, DomainError> {
    let dto = AccountCreate {
        display_name: display_name.to_string(),
        role: DbAccountRole::Player,
        balance,
    };
    Ok(Account::from(accounts_adapter::create_account(conn, dto).await?))
}

pub async fn create_admin<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    display_name: &str,
) -> Result<Account, DomainError> {
    let dto = AccountCreate {
        display_name: display_name.to_string(),
        role: DbAccountRole::Admin,
        balance: 0,
    };
    Ok(Account::from(accounts_adapter::create_account(conn, dto).await?))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    account_id: i64,
) -> Result<Option<Account>, DomainError> {
    let account = accounts_adapter::find_by_id(conn, account_id).await?;
    Ok(account.map(Account::from))
}

/// Load an account that must exist and be a player.
pub async fn require_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
) -> Result<Account, DomainError> {
    match find_by_id(conn, player_id).await? {
        Some(account) if account.is_player() => Ok(account),
        _ => Err(player_not_found(player_id)),
    }
}

/// Debit `amount` from a player; fails with `Insufficient` rather than going negative.
pub async fn debit<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    amount: Money,
) -> Result<(), DomainError> {
    if accounts_adapter::debit_if_sufficient(conn, player_id, amount).await? {
        return Ok(());
    }
    // Nothing was debited; work out why.
    let account = require_player(conn, player_id).await?;
    let balance = account.balance().unwrap_or_default();
    Err(DomainError::insufficient(format!(
        "Player {player_id} has {} but the board costs {}",
        format_money(balance),
        format_money(amount)
    )))
}

pub async fn credit<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: i64,
    amount: Money,
) -> Result<(), DomainError> {
    if accounts_adapter::credit(conn, player_id, amount).await? {
        Ok(())
    } else {
        Err(player_not_found(player_id))
    }
}
