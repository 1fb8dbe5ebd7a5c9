use backend::error::AppError;
use backend::errors::ErrorCode;
use backend::repos::rounds::RoundStatus;

use crate::support::factory::{close_round, get_round, start_round};
use crate::support::state::build_test_state;

#[tokio::test]
async fn start_round_opens_a_fresh_round() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let started = start_round(&state).await?;
    let round = started.round;
    assert_eq!(round.status, RoundStatus::Open);
    assert_eq!(round.revenue, 0);
    assert_eq!(round.prize_pool, 0);
    assert_eq!(round.carried_rollover, 0);
    assert!(round.ended_at.is_none());
    assert!(round.winning_numbers.is_none());
    assert_eq!(started.continuation.source_round_id, None);
    assert!(started.continuation.outcomes.is_empty());
    Ok(())
}

#[tokio::test]
async fn second_start_fails_with_round_already_active() -> Result<(), AppError> {
    let state = build_test_state().await?;
    start_round(&state).await?;

    let err = start_round(&state).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::RoundAlreadyActive);
    Ok(())
}

#[tokio::test]
async fn get_active_round_requires_an_open_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let lifecycle = state.lifecycle();

    let err = backend::db::txn::with_txn(&state, {
        let lifecycle = lifecycle.clone();
        move |txn| Box::pin(async move { Ok(lifecycle.get_active_round(txn).await?) })
    })
    .await
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoActiveRound);

    let round = start_round(&state).await?.round;
    let active = backend::db::txn::with_txn(&state, move |txn| {
        Box::pin(async move { Ok(lifecycle.get_active_round(txn).await?) })
    })
    .await?;
    assert_eq!(active.id, round.id);
    Ok(())
}

#[tokio::test]
async fn close_without_open_round_is_no_active_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let err = close_round(&state, 1, &[1, 2, 3]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoActiveRound);
    Ok(())
}

#[tokio::test]
async fn close_with_wrong_round_id_is_round_mismatch() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let round = start_round(&state).await?.round;

    let err = close_round(&state, round.id + 1, &[1, 2, 3])
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::RoundMismatch);

    // still open
    assert_eq!(get_round(&state, round.id).await?.status, RoundStatus::Open);
    Ok(())
}

#[tokio::test]
async fn close_rejects_invalid_winning_numbers() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let round = start_round(&state).await?.round;

    for bad in [&[1, 2][..], &[1, 2, 3, 4], &[5, 5, 6], &[0, 1, 2], &[1, 2, 17]] {
        let err = close_round(&state, round.id, bad).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidWinningNumbers, "numbers {bad:?}");
    }
    assert_eq!(get_round(&state, round.id).await?.status, RoundStatus::Open);
    Ok(())
}

#[tokio::test]
async fn close_records_numbers_and_end_time() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let round = start_round(&state).await?.round;

    let summary = close_round(&state, round.id, &[11, 8, 1]).await?;
    assert_eq!(summary.round_id, round.id);
    assert_eq!(summary.winning_numbers.as_slice(), &[1, 8, 11]);

    let closed = get_round(&state, round.id).await?;
    assert_eq!(closed.status, RoundStatus::Closed);
    assert!(closed.ended_at.is_some());
    assert_eq!(
        closed.winning_numbers.map(|w| w.as_slice().to_vec()),
        Some(vec![1, 8, 11])
    );
    assert_eq!(closed.rollover_amount, Some(0));
    Ok(())
}

#[tokio::test]
async fn closing_twice_is_no_active_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let round = start_round(&state).await?.round;
    close_round(&state, round.id, &[1, 2, 3]).await?;

    let err = close_round(&state, round.id, &[1, 2, 3]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoActiveRound);
    Ok(())
}

#[tokio::test]
async fn rounds_history_and_lookup() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let first = start_round(&state).await?.round;
    close_round(&state, first.id, &[1, 2, 3]).await?;
    let second = start_round(&state).await?.round;

    let lifecycle = state.lifecycle();
    let rounds = backend::db::txn::with_txn(&state, move |txn| {
        Box::pin(async move { Ok(lifecycle.list_rounds(txn, 10).await?) })
    })
    .await?;
    let ids: Vec<i64> = rounds.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let err = get_round(&state, 9_999).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::RoundNotFound);
    Ok(())
}
