use std::time::Duration;

use backend::error::AppError;
use backend::scheduler::{RoundTrigger, TriggerOutcome, WeeklySchedule};
use time::{OffsetDateTime, Time, Weekday};
use tokio_util::sync::CancellationToken;

use crate::support::factory::{buy, close_round, create_player, get_round, start_round};
use crate::support::state::{build_state_with_draw, build_test_state};

#[tokio::test]
async fn start_fires_once_per_open_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let trigger = RoundTrigger::new(state.clone());
    let now = OffsetDateTime::now_utc();

    let first = trigger.fire_start(now).await;
    let TriggerOutcome::Started {
        round_id,
        continued,
        skipped,
    } = first
    else {
        panic!("expected Started, got {first:?}");
    };
    assert_eq!((continued, skipped), (0, 0));
    assert!(get_round(&state, round_id).await?.is_open());

    assert_eq!(trigger.fire_start(now).await, TriggerOutcome::AlreadyActive);
    Ok(())
}

#[tokio::test]
async fn close_uses_the_fallback_draw() -> Result<(), AppError> {
    let state = build_state_with_draw(&[1, 2, 3]).await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let round = start_round(&state).await?.round;
    buy(&state, p, round.id, &[1, 2, 3, 4, 5], 0).await?;

    let trigger = RoundTrigger::new(state.clone());
    let outcome = trigger.fire_close(OffsetDateTime::now_utc()).await;
    assert_eq!(
        outcome,
        TriggerOutcome::Closed {
            round_id: round.id,
            winners: 1,
            rollover_amount: 0,
        }
    );

    let closed = get_round(&state, round.id).await?;
    assert!(!closed.is_open());
    assert_eq!(
        closed.winning_numbers.map(|w| w.as_slice().to_vec()),
        Some(vec![1, 2, 3])
    );
    Ok(())
}

#[tokio::test]
async fn close_without_open_round_is_a_no_op() -> Result<(), AppError> {
    let state = build_state_with_draw(&[1, 2, 3]).await?;
    let trigger = RoundTrigger::new(state);
    assert_eq!(
        trigger.fire_close(OffsetDateTime::now_utc()).await,
        TriggerOutcome::NothingToClose
    );
    Ok(())
}

#[tokio::test]
async fn operator_close_preempts_the_schedule() -> Result<(), AppError> {
    let state = build_state_with_draw(&[1, 2, 3]).await?;
    let round = start_round(&state).await?.round;
    close_round(&state, round.id, &[7, 8, 9]).await?;

    let trigger = RoundTrigger::new(state.clone());
    assert_eq!(
        trigger.fire_close(OffsetDateTime::now_utc()).await,
        TriggerOutcome::NothingToClose
    );
    let closed = get_round(&state, round.id).await?;
    assert_eq!(
        closed.winning_numbers.map(|w| w.as_slice().to_vec()),
        Some(vec![7, 8, 9])
    );
    Ok(())
}

#[tokio::test]
async fn without_fallback_the_round_waits_for_an_operator() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let round = start_round(&state).await?.round;

    let trigger = RoundTrigger::new(state.clone());
    assert_eq!(
        trigger.fire_close(OffsetDateTime::now_utc()).await,
        TriggerOutcome::AwaitingOperator { round_id: round.id }
    );
    assert!(get_round(&state, round.id).await?.is_open());
    Ok(())
}

#[tokio::test]
async fn spawned_loops_stop_on_cancel() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let never_soon = WeeklySchedule::new(Weekday::Sunday, Time::MIDNIGHT);
    let trigger = RoundTrigger::with_schedules(state, never_soon, never_soon);

    let token = CancellationToken::new();
    let handles = trigger.spawn(token.clone());
    token.cancel();

    tokio::time::timeout(Duration::from_secs(5), handles.join())
        .await
        .expect("trigger loops did not stop");
    Ok(())
}
