use sea_orm::DatabaseTransaction;
use tracing::info;

use crate::domain::pricing::{format_money, Money};
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::accounts::{self, Account};

/// Player and admin accounts, and the `BalanceCredited` handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountService;

impl AccountService {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_player(
        &self,
        txn: &DatabaseTransaction,
        display_name: &str,
        opening_balance: Money,
    ) -> Result<Account, DomainError> {
        if opening_balance < 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidAmount,
                "Opening balance cannot be negative",
            ));
        }
        let account = accounts::create_player(txn, display_name, opening_balance).await?;
        info!(player_id = account.id, "Player account created");
        Ok(account)
    }

    pub async fn create_admin(
        &self,
        txn: &DatabaseTransaction,
        display_name: &str,
    ) -> Result<Account, DomainError> {
        accounts::create_admin(txn, display_name).await
    }

    pub async fn get_player(
        &self,
        txn: &DatabaseTransaction,
        player_id: i64,
    ) -> Result<Account, DomainError> {
        accounts::require_player(txn, player_id).await
    }

    /// Apply an approved deposit. Returns the account with its new balance.
    pub async fn credit_balance(
        &self,
        txn: &DatabaseTransaction,
        player_id: i64,
        amount: Money,
    ) -> Result<Account, DomainError> {
        if amount <= 0 {
            return Err(DomainError::validation(
                ValidationKind::InvalidAmount,
                format!("Credit amount must be positive, got {}", format_money(amount)),
            ));
        }
        accounts::credit(txn, player_id, amount).await?;
        info!(player_id, amount, "Balance credited");
        accounts::require_player(txn, player_id).await
    }
}
