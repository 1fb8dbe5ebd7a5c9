use actix_web::http::StatusCode;
use actix_web::test;
use backend::error::AppError;
use backend_test_support::problem_details::assert_problem_response;
use serde_json::{json, Value};

use crate::support::factory::{balance_of, create_player, start_round};
use crate::support::state::build_test_state;

fn purchase(player_id: i64, body: Value) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/api/players/{player_id}/boards"))
        .set_json(body)
}

#[actix_web::test]
async fn purchase_returns_created_board() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let round = start_round(&state).await?.round;
    let app = test_app!(state.clone());

    let resp = test::call_service(
        &app,
        purchase(
            p,
            json!({ "round_id": round.id, "numbers": [9, 3, 1, 12, 5, 7], "continuation_weeks": 3 }),
        ).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["numbers"], json!([1, 3, 5, 7, 9, 12]));
    assert_eq!(body["field_count"], 6);
    assert_eq!(body["cost"], 4_000);
    assert_eq!(body["autoplay"], true);
    assert_eq!(body["remaining_weeks"], 3);
    assert_eq!(body["is_winning"], false);
    assert_eq!(balance_of(&state, p).await?, 6_000);
    Ok(())
}

#[actix_web::test]
async fn continuation_weeks_default_to_zero() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let round = start_round(&state).await?.round;
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        purchase(p, json!({ "round_id": round.id, "numbers": [1, 2, 3, 4, 5] })).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["autoplay"], false);
    assert_eq!(body["remaining_weeks"], 0);
    Ok(())
}

#[actix_web::test]
async fn wrong_field_count_is_400() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let round = start_round(&state).await?.round;
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        purchase(p, json!({ "round_id": round.id, "numbers": [1, 2, 3, 4] })).to_request(),
    )
    .await;
    assert_problem_response(resp, "INVALID_FIELD_COUNT", StatusCode::BAD_REQUEST, None).await;
    Ok(())
}

#[actix_web::test]
async fn insufficient_balance_is_422() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 1_999).await?;
    let round = start_round(&state).await?.round;
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        purchase(p, json!({ "round_id": round.id, "numbers": [1, 2, 3, 4, 5] })).to_request(),
    )
    .await;
    assert_problem_response(
        resp,
        "INSUFFICIENT_BALANCE",
        StatusCode::UNPROCESSABLE_ENTITY,
        None,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn purchase_without_open_round_is_409() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let app = test_app!(state);

    let resp = test::call_service(
        &app,
        purchase(p, json!({ "round_id": 1, "numbers": [1, 2, 3, 4, 5] })).to_request(),
    )
    .await;
    assert_problem_response(resp, "NO_ACTIVE_ROUND", StatusCode::CONFLICT, None).await;
    Ok(())
}

#[actix_web::test]
async fn history_filters_by_round() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let round = start_round(&state).await?.round;
    let app = test_app!(state);

    for numbers in [json!([1, 2, 3, 4, 5]), json!([6, 7, 8, 9, 10])] {
        let resp = test::call_service(
            &app,
            purchase(p, json!({ "round_id": round.id, "numbers": numbers })).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/players/{p}/boards?round_id={}", round.id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let req = test::TestRequest::get()
        .uri(&format!("/api/players/{p}/boards?round_id={}", round.id + 1))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([]));

    let req = test::TestRequest::get()
        .uri(&format!("/api/players/{p}/boards?limit=1"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[actix_web::test]
async fn oversized_continuation_weeks_is_400() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let p = create_player(&state, "pat", 10_000).await?;
    let round = start_round(&state).await?.round;
    let app = test_app!(state.clone());

    let resp = test::call_service(
        &app,
        purchase(
            p,
            json!({ "round_id": round.id, "numbers": [1, 2, 3, 4, 5], "continuation_weeks": 3_000_000_000u64 }),
        )
        .to_request(),
    )
    .await;
    assert_problem_response(
        resp,
        "VALIDATION_ERROR",
        StatusCode::BAD_REQUEST,
        Some("continuation_weeks"),
    )
    .await;
    assert_eq!(balance_of(&state, p).await?, 10_000);
    Ok(())
}
