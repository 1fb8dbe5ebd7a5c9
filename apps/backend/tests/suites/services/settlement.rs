use std::sync::Arc;

use backend::config::db::DbKind;
use backend::db::txn::with_txn;
use backend::domain::StandardPrizePolicy;
use backend::entities::accounts::{self as account_rows, AccountRole};
use backend::error::AppError;
use backend::errors::ErrorCode;
use backend::infra::state::build_state;
use backend::repos::boards;
use backend::state::app_state::AppState;
use sea_orm::{ActiveModelTrait, Set};

use crate::support::factory::{
    balance_of, boards_of, buy, close_round, create_player, get_round, start_round,
};
use crate::support::state::build_test_state;

#[tokio::test]
async fn no_winners_rolls_the_whole_pool_forward() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let round = start_round(&state).await?.round;
    buy(&state, p, round.id, &[1, 2, 3, 4, 5], 0).await?;
    buy(&state, p, round.id, &[6, 7, 8, 9, 10, 11], 0).await?;

    let summary = close_round(&state, round.id, &[14, 15, 16]).await?;
    assert!(summary.winners.is_empty());
    assert_eq!(summary.prize_pool, 6_000);
    assert_eq!(summary.rollover_amount, 6_000);

    let closed = get_round(&state, round.id).await?;
    assert_eq!(closed.prize_pool, 6_000);
    assert_eq!(closed.rollover_amount, Some(6_000));

    let next = start_round(&state).await?.round;
    assert_eq!(next.carried_rollover, 6_000);
    Ok(())
}

#[tokio::test]
async fn winners_split_the_pool_and_get_credited() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let alice = create_player(&state, "alice", 10_000).await?;
    let bob = create_player(&state, "bob", 10_000).await?;
    let round = start_round(&state).await?.round;
    let a = buy(&state, alice, round.id, &[1, 8, 11, 2, 3], 0).await?;
    let b = buy(&state, bob, round.id, &[4, 5, 1, 11, 6, 8], 0).await?;
    let c = buy(&state, bob, round.id, &[5, 6, 7, 8, 9, 10], 0).await?;

    let summary = close_round(&state, round.id, &[8, 11, 1]).await?;
    // revenue 2000 + 4000 + 4000, no house take
    assert_eq!(summary.prize_pool, 10_000);
    assert_eq!(summary.winners.len(), 2);
    let total: i64 = summary.winners.iter().map(|w| w.payout).sum();
    assert_eq!(total + summary.residue, summary.prize_pool);
    assert_eq!(summary.rollover_amount, 0);

    let winning_boards: Vec<i64> = summary.winners.iter().map(|w| w.board_id).collect();
    assert_eq!(winning_boards, vec![a.id, b.id]);

    assert!(summary.winners.iter().all(|w| w.payout == 5_000));
    assert_eq!(balance_of(&state, alice).await?, 8_000 + 5_000);
    assert_eq!(balance_of(&state, bob).await?, 2_000 + 5_000);

    let round_id = round.id;
    let stored = with_txn(&state, move |txn| {
        Box::pin(async move { Ok(boards::find_by_round(txn, round_id).await?) })
    })
    .await?;
    let flags: Vec<(i64, bool)> = stored.iter().map(|b| (b.id, b.is_winning)).collect();
    assert_eq!(flags, vec![(a.id, true), (b.id, true), (c.id, false)]);

    let lifecycle = state.lifecycle();
    let listed = with_txn(&state, move |txn| {
        Box::pin(async move { Ok(lifecycle.list_winners(txn, round_id).await?) })
    })
    .await?;
    assert_eq!(listed, summary.winners);
    Ok(())
}

#[tokio::test]
async fn uneven_split_rolls_the_residue() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 100_000).await?;
    let round = start_round(&state).await?.round;
    for numbers in [
        [1, 2, 3, 4, 5],
        [1, 2, 3, 6, 7],
        [1, 2, 3, 8, 9],
        [10, 11, 12, 13, 14],
    ] {
        buy(&state, p, round.id, &numbers, 0).await?;
    }

    let summary = close_round(&state, round.id, &[1, 2, 3]).await?;
    assert_eq!(summary.prize_pool, 8_000);
    assert_eq!(summary.winners.len(), 3);
    assert!(summary.winners.iter().all(|w| w.payout == 2_666));
    assert_eq!(summary.residue, 2);
    assert_eq!(summary.rollover_amount, 2);

    let next = start_round(&state).await?.round;
    assert_eq!(next.carried_rollover, 2);
    Ok(())
}

#[tokio::test]
async fn carried_rollover_is_paid_out_next_time() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let first = start_round(&state).await?.round;
    buy(&state, p, first.id, &[1, 2, 3, 4, 5], 0).await?;
    close_round(&state, first.id, &[14, 15, 16]).await?;

    let second = start_round(&state).await?.round;
    buy(&state, p, second.id, &[1, 2, 3, 4, 5], 0).await?;
    let summary = close_round(&state, second.id, &[3, 4, 5]).await?;
    assert_eq!(summary.prize_pool, 4_000);
    assert_eq!(summary.winners.len(), 1);
    assert_eq!(balance_of(&state, p).await?, 6_000 + 4_000);
    Ok(())
}

#[tokio::test]
async fn house_share_reduces_the_pool() -> Result<(), AppError> {
    let state = build_state()
        .with_db(DbKind::SqliteMemory)
        .with_prize_policy(Arc::new(StandardPrizePolicy::default()))
        .with_number_source(None)
        .build()
        .await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let round = start_round(&state).await?.round;
    buy(&state, p, round.id, &[1, 2, 3, 4, 5], 0).await?;

    let summary = close_round(&state, round.id, &[1, 2, 3]).await?;
    // 30 % of 2000 stays with the house
    assert_eq!(summary.prize_pool, 1_400);
    assert_eq!(balance_of(&state, p).await?, 8_000 + 1_400);
    Ok(())
}

/// Walkthrough: buy, win alone, autoplay carries the other board forward.
#[tokio::test]
async fn single_winner_then_autoplay_continues() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let r1 = start_round(&state).await?.round;

    let winner = buy(&state, p, r1.id, &[1, 8, 11, 2, 3], 0).await?;
    assert_eq!(winner.field_count(), 5);
    assert_eq!(balance_of(&state, p).await?, 8_000);
    let auto = buy(&state, p, r1.id, &[4, 5, 6, 7, 9], 2).await?;
    assert_eq!(balance_of(&state, p).await?, 6_000);

    let summary = close_round(&state, r1.id, &[8, 11, 1]).await?;
    assert_eq!(summary.winners.len(), 1);
    assert_eq!(summary.winners[0].board_id, winner.id);
    assert_eq!(summary.winners[0].payout, summary.prize_pool);
    assert_eq!(balance_of(&state, p).await?, 6_000 + 4_000);

    let r2 = start_round(&state).await?;
    assert_eq!(r2.continuation.continued(), 1);
    let boards = boards_of(&state, p, Some(r2.round.id)).await?;
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].source_board_id, Some(auto.id));
    assert_eq!(boards[0].remaining_weeks, 1);
    assert_eq!(boards[0].numbers, auto.numbers);
    assert_eq!(balance_of(&state, p).await?, 8_000);
    Ok(())
}

async fn set_role(state: &AppState, account_id: i64, role: AccountRole) -> Result<(), AppError> {
    with_txn(state, move |txn| {
        Box::pin(async move {
            account_rows::ActiveModel {
                id: Set(account_id),
                role: Set(role),
                ..Default::default()
            }
            .update(txn)
            .await?;
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn failed_payout_leaves_the_round_untouched() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let alice = create_player(&state, "alice", 10_000).await?;
    let bob = create_player(&state, "bob", 10_000).await?;
    let round = start_round(&state).await?.round;
    buy(&state, alice, round.id, &[1, 2, 3, 4, 5], 0).await?;
    buy(&state, bob, round.id, &[1, 2, 3, 6, 7], 0).await?;

    // alice is credited first, then bob can no longer receive money
    set_role(&state, bob, AccountRole::Admin).await?;
    let err = close_round(&state, round.id, &[1, 2, 3]).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::PlayerNotFound);

    let after = get_round(&state, round.id).await?;
    assert!(after.is_open());
    assert!(after.ended_at.is_none());
    assert!(after.winning_numbers.is_none());
    assert_eq!(after.rollover_amount, None);
    assert_eq!(after.revenue, 4_000);

    let round_id = round.id;
    let lifecycle = state.lifecycle();
    let listed = with_txn(&state, move |txn| {
        Box::pin(async move { Ok(lifecycle.list_winners(txn, round_id).await?) })
    })
    .await?;
    assert!(listed.is_empty());

    let stored = with_txn(&state, move |txn| {
        Box::pin(async move { Ok(boards::find_by_round(txn, round_id).await?) })
    })
    .await?;
    assert!(stored.iter().all(|b| !b.is_winning));
    assert_eq!(balance_of(&state, alice).await?, 8_000);

    set_role(&state, bob, AccountRole::Player).await?;
    assert_eq!(balance_of(&state, bob).await?, 8_000);

    let summary = close_round(&state, round.id, &[1, 2, 3]).await?;
    assert_eq!(summary.winners.len(), 2);
    assert_eq!(balance_of(&state, alice).await?, 8_000 + 2_000);
    assert_eq!(balance_of(&state, bob).await?, 8_000 + 2_000);
    assert!(!get_round(&state, round.id).await?.is_open());
    Ok(())
}
