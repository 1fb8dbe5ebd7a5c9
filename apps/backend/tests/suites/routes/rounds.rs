use actix_web::http::StatusCode;
use actix_web::test;
use backend::error::AppError;
use backend_test_support::problem_details::assert_problem_response;
use serde_json::{json, Value};

use crate::support::factory::{buy, close_round, create_player, start_round};
use crate::support::state::build_test_state;

#[actix_web::test]
async fn active_round_is_409_when_none_is_open() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/rounds/active").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_response(resp, "NO_ACTIVE_ROUND", StatusCode::CONFLICT, None).await;
    Ok(())
}

#[actix_web::test]
async fn active_round_is_returned() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let round = start_round(&state).await?.round;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/rounds/active").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["id"], round.id);
    assert_eq!(body["status"], "OPEN");
    assert_eq!(body["revenue"], 0);
    assert!(body["ended_at"].is_null());
    assert!(body["winning_numbers"].is_null());
    Ok(())
}

#[actix_web::test]
async fn unknown_round_is_404() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/rounds/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_response(resp, "ROUND_NOT_FOUND", StatusCode::NOT_FOUND, Some("999")).await;

    let req = test::TestRequest::get()
        .uri("/api/rounds/999/winners")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_response(resp, "ROUND_NOT_FOUND", StatusCode::NOT_FOUND, None).await;
    Ok(())
}

#[actix_web::test]
async fn closed_round_exposes_winners_and_history() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let first = start_round(&state).await?.round;
    let board = buy(&state, p, first.id, &[1, 8, 11, 2, 3], 0).await?;
    close_round(&state, first.id, &[1, 8, 11]).await?;
    let second = start_round(&state).await?.round;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/rounds/{}", first.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "CLOSED");
    assert_eq!(body["winning_numbers"], json!([1, 8, 11]));
    assert_eq!(body["prize_pool"], 2_000);
    assert_eq!(body["rollover_amount"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/rounds/{}/winners", first.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!([{ "player_id": p, "board_id": board.id, "payout": 2_000 }])
    );

    let req = test::TestRequest::get()
        .uri("/api/rounds?limit=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<i64> = body
        .as_array()
        .map(|rounds| rounds.iter().filter_map(|r| r["id"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![second.id, first.id]);
    Ok(())
}
