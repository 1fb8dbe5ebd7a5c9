//! Extractor rejections and id validation render as problem details.

use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::test;
use backend::error::AppError;
use backend_test_support::problem_details::assert_problem_response;

use crate::support::state::build_test_state;

#[actix_web::test]
async fn malformed_json_is_bad_request() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/players/1/boards")
        .insert_header(ContentType::json())
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_response(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, Some("Invalid JSON")).await;
    Ok(())
}

#[actix_web::test]
async fn out_of_range_number_type_is_bad_request() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/players/1/boards")
        .set_json(serde_json::json!({ "round_id": 1, "numbers": [1, 2, 3, 4, 300] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_response(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, None).await;
    Ok(())
}

#[actix_web::test]
async fn non_numeric_path_is_bad_request() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/rounds/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_response(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, Some("Invalid path")).await;
    Ok(())
}

#[actix_web::test]
async fn bad_query_is_bad_request() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = test_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/players/1/boards?limit=lots")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_response(resp, "BAD_REQUEST", StatusCode::BAD_REQUEST, Some("Invalid query")).await;
    Ok(())
}

#[actix_web::test]
async fn non_positive_ids_are_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/api/rounds/0").to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_response(resp, "INVALID_ROUND_ID", StatusCode::BAD_REQUEST, None).await;

    let req = test::TestRequest::get()
        .uri("/api/players/-4/boards")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_response(resp, "INVALID_PLAYER_ID", StatusCode::BAD_REQUEST, None).await;
    Ok(())
}
