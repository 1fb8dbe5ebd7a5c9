//! Many tasks hitting the same player or round at once.

use backend::error::AppError;
use backend::errors::ErrorCode;

use crate::support::factory::{
    balance_of, boards_of, buy, close_round, create_player, get_round, start_round,
};
use crate::support::state::build_test_state;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_purchases_never_overdraw() -> Result<(), AppError> {
    let state = build_test_state().await?;
    // enough for exactly five 5-number boards
    let p = create_player(&state, "pat", 10_000).await?;
    let round_id = start_round(&state).await?.round.id;

    let mut handles = Vec::new();
    for _ in 0..12 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            buy(&state, p, round_id, &[1, 2, 3, 4, 5], 0).await
        }));
    }

    let mut bought = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => bought += 1,
            Err(e) => assert_eq!(e.code(), ErrorCode::InsufficientBalance),
        }
    }

    assert_eq!(bought, 5);
    assert_eq!(balance_of(&state, p).await?, 0);
    assert_eq!(boards_of(&state, p, Some(round_id)).await?.len(), 5);
    assert_eq!(get_round(&state, round_id).await?.revenue, 10_000);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn only_one_concurrent_start_wins() -> Result<(), AppError> {
    let state = build_test_state().await?;

    let mut handles = Vec::new();
    for _ in 0..6 {
        let state = state.clone();
        handles.push(tokio::spawn(async move { start_round(&state).await }));
    }

    let mut started = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => started += 1,
            Err(e) => assert_eq!(e.code(), ErrorCode::RoundAlreadyActive),
        }
    }
    assert_eq!(started, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn purchases_racing_a_close_are_accounted() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 100_000).await?;
    let round_id = start_round(&state).await?.round.id;

    let mut buys = Vec::new();
    for _ in 0..8 {
        let state = state.clone();
        buys.push(tokio::spawn(async move {
            buy(&state, p, round_id, &[1, 2, 3, 4, 5], 0).await
        }));
    }
    let closer = {
        let state = state.clone();
        tokio::spawn(async move { close_round(&state, round_id, &[14, 15, 16]).await })
    };

    let mut bought = 0i64;
    for handle in buys {
        match handle.await.expect("task panicked") {
            Ok(_) => bought += 1,
            Err(e) => assert_eq!(e.code(), ErrorCode::NoActiveRound),
        }
    }
    let summary = closer.await.expect("task panicked")?;

    // every accepted board was paid for and made it into the settled pool
    let closed = get_round(&state, round_id).await?;
    assert!(!closed.is_open());
    assert_eq!(balance_of(&state, p).await?, 100_000 - bought * 2_000);
    assert_eq!(closed.revenue, bought * 2_000);
    assert_eq!(summary.prize_pool, summary.rollover_amount);
    assert_eq!(
        boards_of(&state, p, Some(round_id)).await?.len() as i64,
        bought
    );
    Ok(())
}
