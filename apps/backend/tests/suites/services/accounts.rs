use backend::db::txn::with_txn;
use backend::error::AppError;
use backend::errors::ErrorCode;

use crate::support::factory::{balance_of, create_admin, create_player};
use crate::support::state::build_test_state;

async fn credit(state: &backend::AppState, player_id: i64, amount: i64) -> Result<i64, AppError> {
    let accounts = state.accounts();
    let account = with_txn(state, move |txn| {
        Box::pin(async move { Ok(accounts.credit_balance(txn, player_id, amount).await?) })
    })
    .await?;
    Ok(account.balance().unwrap_or_default())
}

#[tokio::test]
async fn credit_adds_to_balance() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 1_000).await?;

    assert_eq!(credit(&state, p, 2_500).await?, 3_500);
    assert_eq!(balance_of(&state, p).await?, 3_500);
    Ok(())
}

#[tokio::test]
async fn credit_rejects_non_positive_amounts() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 1_000).await?;

    for amount in [0, -100] {
        let err = credit(&state, p, amount).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidAmount);
    }
    assert_eq!(balance_of(&state, p).await?, 1_000);
    Ok(())
}

#[tokio::test]
async fn credit_requires_a_player() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let admin = create_admin(&state, "ops").await?;

    let err = credit(&state, 9_999, 100).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PlayerNotFound);
    let err = credit(&state, admin, 100).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PlayerNotFound);
    Ok(())
}

#[tokio::test]
async fn negative_opening_balance_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let err = create_player(&state, "pat", -1).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidAmount);
    Ok(())
}

#[tokio::test]
async fn admins_have_no_balance() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let admin = create_admin(&state, "ops").await?;
    let err = balance_of(&state, admin).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PlayerNotFound);
    Ok(())
}
