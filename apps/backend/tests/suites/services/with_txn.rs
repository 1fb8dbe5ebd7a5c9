use backend::db::txn::with_txn;
use backend::error::AppError;
use backend::errors::ErrorCode;
use backend::infra::state::build_state;
use backend::repos::accounts;

use crate::support::state::build_test_state;

#[tokio::test]
async fn error_rolls_back_earlier_writes() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let result: Result<(), AppError> = with_txn(&state, |txn| {
        Box::pin(async move {
            let account = accounts::create_player(txn, "ghost", 500).await?;
            Err(AppError::internal(format!("abort after {}", account.id)))
        })
    })
    .await;
    assert_eq!(result.unwrap_err().code(), ErrorCode::Internal);

    let found = with_txn(&state, |txn| {
        Box::pin(async move { Ok(accounts::find_by_id(txn, 1).await?) })
    })
    .await?;
    assert!(found.is_none());
    Ok(())
}

#[tokio::test]
async fn ok_commits() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let id = with_txn(&state, |txn| {
        Box::pin(async move { Ok(accounts::create_player(txn, "pat", 500).await?.id) })
    })
    .await?;

    let found = with_txn(&state, move |txn| {
        Box::pin(async move { Ok(accounts::find_by_id(txn, id).await?) })
    })
    .await?;
    assert_eq!(found.and_then(|a| a.balance()), Some(500));
    Ok(())
}

#[tokio::test]
async fn missing_database_is_unavailable() -> Result<(), AppError> {
    let state = build_state().build().await?;
    let err = with_txn(&state, |_txn| Box::pin(async move { Ok(()) }))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::DbUnavailable);
    Ok(())
}
